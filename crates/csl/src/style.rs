// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Describes the `<style>` element and all its children, and parses it from
//! an XML tree.

use crate::attr::{
    attribute_atom, attribute_bool, attribute_option, attribute_option_atom, attribute_optional,
    attribute_required,
};
use crate::error::{CslError, InvalidCsl, PartitionResults, Severity, StyleError};
use crate::from_node::{exactly_one_child, AttrChecker, FromNode, FromNodeResult, ParseInfo};
use crate::locale::{Lang, Locale};
use crate::terms::TermForm;
use crate::variables::Variable;
use crate::{Atom, SmartString};
use fnv::{FnvHashMap, FnvHashSet};
use roxmltree::{Document, Node};

/// Whether citations are rendered in the text body or in notes. This engine
/// renders both the same way, but the attribute is required and validated.
#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumString)]
#[strum(serialize_all = "kebab_case")]
pub enum StyleClass {
    InText,
    Note,
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Delimiter(pub Atom);

impl Delimiter {
    fn from_attr(node: &Node) -> Self {
        Delimiter(attribute_atom(node, "delimiter"))
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Affixes {
    pub prefix: Atom,
    pub suffix: Atom,
}

impl Affixes {
    fn from_attrs(node: &Node) -> Self {
        Affixes {
            prefix: attribute_atom(node, "prefix"),
            suffix: attribute_atom(node, "suffix"),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.suffix.is_empty()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumString)]
#[strum(serialize_all = "kebab_case")]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumString)]
#[strum(serialize_all = "kebab_case")]
pub enum FontWeight {
    Normal,
    Bold,
    Light,
}

/// Character formatting carried on an element, honored by markup output
/// formats and ignored by plain text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct Formatting {
    pub font_style: Option<FontStyle>,
    pub font_weight: Option<FontWeight>,
}

impl AttrChecker for Formatting {
    fn filter_attribute(attr: &str) -> bool {
        attr == "font-style" || attr == "font-weight"
    }
}

impl FromNode for Formatting {
    fn from_node(node: &Node, _info: &ParseInfo) -> FromNodeResult<Self> {
        Ok(Formatting {
            font_style: attribute_option(node, "font-style")?,
            font_weight: attribute_option(node, "font-weight")?,
        })
    }
}

/// Where a `<text>` element gets its content from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TextSource {
    /// `<text value="..."/>`
    Value(Atom),
    /// `<text variable="..."/>`
    Variable(Variable),
    /// `<text term="..." form="..." plural="..."/>`
    Term(Atom, TermForm, bool),
    /// `<text macro="..."/>`
    Macro(SmartString),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TextElement {
    pub source: TextSource,
    pub formatting: Option<Formatting>,
    pub affixes: Affixes,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Group {
    pub formatting: Option<Formatting>,
    pub delimiter: Delimiter,
    pub affixes: Affixes,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Element {
    /// `<text>`
    Text(TextElement),
    /// `<group>`
    Group(Group),
}

impl FromNode for TextElement {
    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self> {
        let value = attribute_option_atom(node, "value");
        let variable: Option<Variable> = attribute_option(node, "variable")?;
        let term = attribute_option_atom(node, "term");
        let mac = node.attribute("macro");

        let sources = value.is_some() as u8
            + variable.is_some() as u8
            + term.is_some() as u8
            + mac.is_some() as u8;
        if sources != 1 {
            return Err(InvalidCsl::new(
                node,
                "<text> must have exactly one of `value`, `variable`, `term`, `macro`",
            )
            .into());
        }

        let source = if let Some(value) = value {
            TextSource::Value(value)
        } else if let Some(variable) = variable {
            TextSource::Variable(variable)
        } else if let Some(term) = term {
            let form: TermForm = attribute_optional(node, "form")?;
            let plural = attribute_bool(node, "plural", false)?;
            TextSource::Term(term, form, plural)
        } else {
            let name = SmartString::from(mac.unwrap_or(""));
            if let Some(macros) = info.macros.as_ref() {
                if !macros.contains(&name) {
                    return Err(InvalidCsl::new(
                        node,
                        format!("<text macro=\"{}\"> references an undefined macro", name),
                    )
                    .into());
                }
            }
            TextSource::Macro(name)
        };

        Ok(TextElement {
            source,
            formatting: Option::from_node(node, info)?,
            affixes: Affixes::from_attrs(node),
        })
    }
}

impl FromNode for Group {
    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self> {
        let elements = child_elements(node, info)?;
        if elements.is_empty() {
            return Err(InvalidCsl::new(node, "<group> must have at least one child").into());
        }
        Ok(Group {
            formatting: Option::from_node(node, info)?,
            delimiter: Delimiter::from_attr(node),
            affixes: Affixes::from_attrs(node),
            elements,
        })
    }
}

impl FromNode for Element {
    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self> {
        match node.tag_name().name() {
            "text" => Ok(Element::Text(TextElement::from_node(node, info)?)),
            "group" => Ok(Element::Group(Group::from_node(node, info)?)),
            _ => Err(InvalidCsl::new(
                node,
                format!("Unsupported element <{}>", node.tag_name().name()),
            )
            .into()),
        }
    }
}

fn child_elements(node: &Node, info: &ParseInfo) -> FromNodeResult<Vec<Element>> {
    node.children()
        .filter(|n| n.is_element())
        .map(|el| Element::from_node(&el, info))
        .partition_results()
        .map_err(CslError::from)
}

/// `<layout>`: the ordered rendering elements for one cite, the delimiter
/// joining multiple cites, and the affixes around the whole cluster.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Layout {
    pub affixes: Affixes,
    pub formatting: Option<Formatting>,
    pub delimiter: Delimiter,
    pub elements: Vec<Element>,
}

impl FromNode for Layout {
    fn select_child(node: &Node) -> bool {
        node.has_tag_name("layout")
    }
    const CHILD_DESC: &'static str = "layout";

    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self> {
        let elements = child_elements(node, info)?;
        if elements.is_empty() {
            return Err(InvalidCsl::new(node, "<layout> must have at least one child").into());
        }
        Ok(Layout {
            affixes: Affixes::from_attrs(node),
            formatting: Option::from_node(node, info)?,
            delimiter: Delimiter::from_attr(node),
            elements,
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Citation {
    pub layout: Layout,
}

impl FromNode for Citation {
    fn select_child(node: &Node) -> bool {
        node.has_tag_name("citation")
    }
    const CHILD_DESC: &'static str = "citation";

    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self> {
        let mut errors = Vec::new();
        let layout = exactly_one_child::<Layout>(node, info, &mut errors);
        if !errors.is_empty() {
            return Err(CslError(errors));
        }
        Ok(Citation { layout: layout? })
    }
}

/// A parsed, validated, immutable citation style.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub class: StyleClass,
    pub version: SmartString,
    pub default_locale: Lang,
    pub macros: FnvHashMap<SmartString, Vec<Element>>,
    pub citation: Citation,
    /// Inline `<locale>` elements in the style, keyed by their `xml:lang`.
    /// `None` is the override-everything locale.
    pub locale_overrides: FnvHashMap<Option<Lang>, Locale>,
}

use std::str::FromStr;
impl FromStr for Style {
    type Err = StyleError;
    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        Style::parse(xml)
    }
}

impl Style {
    pub fn parse(xml: &str) -> Result<Self, StyleError> {
        let doc = Document::parse(xml)?;
        let node = &doc.root_element();

        if node.tag_name().name() != "style" {
            return Err(InvalidCsl::new(
                node,
                format!(
                    "root node must be a `<style>` node, was `<{}>` instead",
                    node.tag_name().name()
                ),
            )
            .into());
        }

        let version: SmartString = match node.attribute("version") {
            Some(v) => v.into(),
            None => return Err(InvalidCsl::missing(node, "version").into()),
        };
        if version.split('.').next() != Some("1") {
            return Err(InvalidCsl::attr_val(node, "version", &version).into());
        }
        let class: StyleClass = attribute_required(node, "class")?;
        let default_locale: Lang = attribute_optional(node, "default-locale")?;

        // First pass: collect macro names so references can be validated
        // while parsing bodies, including forward references.
        let mut macro_names: FnvHashSet<SmartString> = FnvHashSet::default();
        for mac in node.children().filter(|el| el.has_tag_name("macro")) {
            match mac.attribute("name") {
                Some(name) => {
                    if !macro_names.insert(name.into()) {
                        return Err(InvalidCsl::new(
                            &mac,
                            format!("duplicate <macro name=\"{}\">", name),
                        )
                        .into());
                    }
                }
                None => return Err(InvalidCsl::missing(&mac, "name").into()),
            }
        }
        let info = ParseInfo {
            macros: Some(macro_names),
        };

        let mut macros = FnvHashMap::default();
        let mut locale_overrides = FnvHashMap::default();
        let mut errors: Vec<InvalidCsl> = Vec::new();
        for child in node.children().filter(|n| n.is_element()) {
            match child.tag_name().name() {
                // metadata, not needed for rendering
                "info" => {}
                "citation" => {}
                "macro" => {
                    // name presence validated in the first pass
                    let name = SmartString::from(child.attribute("name").unwrap_or(""));
                    match child_elements(&child, &info) {
                        Ok(elements) if elements.is_empty() => {
                            errors.push(InvalidCsl::new(
                                &child,
                                "<macro> must have at least one child",
                            ));
                        }
                        Ok(elements) => {
                            macros.insert(name, elements);
                        }
                        Err(e) => errors.extend(e.0),
                    }
                }
                "locale" => match Locale::from_node(&child, &info) {
                    Ok(locale) => {
                        locale_overrides.insert(locale.lang.clone(), locale);
                    }
                    Err(e) => errors.extend(e.0),
                },
                _ => errors.push(InvalidCsl::unknown_element(node, &child)),
            }
        }

        let citation = match exactly_one_child::<Citation>(node, &info, &mut errors) {
            Ok(c) => Some(c),
            Err(e) => {
                errors.extend(e.0);
                None
            }
        };

        if let Err(cycle) = macro_cycle_check(&macros) {
            errors.push(InvalidCsl {
                severity: Severity::Error,
                range: node.range(),
                message: format!("macro \"{}\" is defined in terms of itself", cycle),
                hint: "".into(),
            });
        }

        if !errors.is_empty() {
            return Err(CslError(errors).into());
        }
        // citation is Some if no errors were pushed
        let citation = citation.ok_or_else(|| CslError(Vec::new()))?;

        debug!(
            "parsed style: class {:?}, {} macro(s), {} inline locale(s)",
            class,
            macros.len(),
            locale_overrides.len()
        );
        Ok(Style {
            class,
            version,
            default_locale,
            macros,
            citation,
            locale_overrides,
        })
    }
}

fn collect_macro_refs<'a>(elements: &'a [Element], buf: &mut Vec<&'a SmartString>) {
    for el in elements {
        match el {
            Element::Text(TextElement {
                source: TextSource::Macro(name),
                ..
            }) => buf.push(name),
            Element::Text(_) => {}
            Element::Group(g) => collect_macro_refs(&g.elements, buf),
        }
    }
}

/// Depth-first search for a macro that (transitively) expands itself.
fn macro_cycle_check(
    macros: &FnvHashMap<SmartString, Vec<Element>>,
) -> Result<(), SmartString> {
    #[derive(Copy, Clone, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }
    fn visit<'a>(
        name: &'a SmartString,
        macros: &'a FnvHashMap<SmartString, Vec<Element>>,
        marks: &mut FnvHashMap<&'a SmartString, Mark>,
    ) -> Result<(), SmartString> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => return Err(name.clone()),
            None => {}
        }
        marks.insert(name, Mark::InProgress);
        if let Some(body) = macros.get(name) {
            let mut refs = Vec::new();
            collect_macro_refs(body, &mut refs);
            for r in refs {
                visit(r, macros, marks)?;
            }
        }
        marks.insert(name, Mark::Done);
        Ok(())
    }
    let mut marks = FnvHashMap::default();
    for name in macros.keys() {
        visit(name, macros, &mut marks)?;
    }
    Ok(())
}
