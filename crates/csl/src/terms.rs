// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Localizable terms and the forms they come in.

use crate::attr::{attribute_atom, attribute_optional};
use crate::error::InvalidCsl;
use crate::from_node::{FromNode, FromNodeResult, ParseInfo};
use crate::Atom;
use roxmltree::Node;

/// A term form, with a fallback relation: a missing `short` form falls back
/// to `long`, a missing `verb-short` to `verb` and then `long`, etc.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumString)]
#[strum(serialize_all = "kebab_case")]
pub enum TermForm {
    Long,
    Short,
    Symbol,
    Verb,
    VerbShort,
}

impl Default for TermForm {
    fn default() -> Self {
        TermForm::Long
    }
}

impl TermForm {
    pub fn fallback(self) -> Option<TermForm> {
        use self::TermForm::*;
        match self {
            Long => None,
            Short => Some(Long),
            Symbol => Some(Short),
            Verb => Some(Long),
            VerbShort => Some(Verb),
        }
    }

    /// Iterate this form and then the rest of its fallback chain.
    pub fn chain(self) -> impl Iterator<Item = TermForm> {
        std::iter::successors(Some(self), |f| f.fallback())
    }
}

/// Key for a locale's terms map: a term name plus the form it was defined in.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TermSelector {
    pub name: Atom,
    pub form: TermForm,
}

impl TermSelector {
    pub fn new(name: impl Into<Atom>, form: TermForm) -> Self {
        TermSelector {
            name: name.into(),
            form,
        }
    }

    /// This selector followed by the same name in each fallback form.
    pub fn fallback(&self) -> impl Iterator<Item = TermSelector> + '_ {
        self.form
            .chain()
            .map(move |form| TermSelector::new(self.name.clone(), form))
    }
}

/// The content of a term definition. Most terms are invariant strings; some
/// define distinct singular and plural renditions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TermPlurality {
    Pluralized { single: String, multiple: String },
    Invariant(String),
}

impl TermPlurality {
    pub fn get(&self, plural: bool) -> &str {
        if plural {
            self.plural()
        } else {
            self.singular()
        }
    }
    pub fn singular(&self) -> &str {
        match self {
            TermPlurality::Invariant(s) => s,
            TermPlurality::Pluralized { single, .. } => single,
        }
    }
    pub fn plural(&self) -> &str {
        match self {
            TermPlurality::Invariant(s) => s,
            TermPlurality::Pluralized { multiple, .. } => multiple,
        }
    }
}

/// One `<term>` element, in selector + content form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TermEl {
    pub selector: TermSelector,
    pub content: TermPlurality,
}

fn text_content(node: &Node) -> String {
    node.text().unwrap_or("").to_string()
}

impl FromNode for TermEl {
    fn select_child(node: &Node) -> bool {
        node.has_tag_name("term")
    }
    const CHILD_DESC: &'static str = "term";

    fn from_node(node: &Node, _info: &ParseInfo) -> FromNodeResult<Self> {
        let name = attribute_atom(node, "name");
        if name.is_empty() {
            return Err(InvalidCsl::missing(node, "name").into());
        }
        let form: TermForm = attribute_optional(node, "form")?;
        let single = node.children().find(|el| el.has_tag_name("single"));
        let multiple = node.children().find(|el| el.has_tag_name("multiple"));
        let content = match (single, multiple) {
            (None, None) => TermPlurality::Invariant(text_content(node)),
            (Some(s), Some(m)) => TermPlurality::Pluralized {
                single: text_content(&s),
                multiple: text_content(&m),
            },
            _ => {
                return Err(InvalidCsl::new(
                    node,
                    "<term> must have both <single> and <multiple>, or neither",
                )
                .into())
            }
        };
        Ok(TermEl {
            selector: TermSelector::new(name, form),
            content,
        })
    }
}
