// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::{InvalidCsl, PartitionResults, StyleError};
use crate::from_node::{FromNode, FromNodeResult, ParseInfo};
use crate::terms::{TermEl, TermForm, TermPlurality, TermSelector};
use crate::{Atom, CslError, Severity, SmartString};
use fnv::FnvHashMap;
use roxmltree::{Document, Node};
use std::str::FromStr;

mod lang;
pub use self::lang::{IsoCountry, IsoLang, Lang, LocaleSource};

/// The bundled base locale, merged underneath everything else.
pub const EN_US: &str = include_str!("locales-en-US.xml");

/// This is always bound to the prefix "xml:"
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A parsed `<locale>` document (or inline element): a table of localized
/// terms for one language tag.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub version: SmartString,
    pub lang: Option<Lang>,
    pub terms: FnvHashMap<TermSelector, TermPlurality>,
}

impl FromStr for Locale {
    type Err = StyleError;
    fn from_str(xml: &str) -> Result<Self, Self::Err> {
        Locale::parse(xml)
    }
}

impl Locale {
    pub fn parse(xml: &str) -> Result<Self, StyleError> {
        let doc = Document::parse(xml)?;
        let info = ParseInfo::default();
        let locale = Locale::from_node(&doc.root_element(), &info)?;
        Ok(locale)
    }

    /// Look a term up by name and form, falling back through the form chain
    /// (e.g. missing `short` → `long`) before reporting absence.
    ///
    /// May return `Some("")` if the term is defined but empty; term-rendering
    /// call sites treat that as an empty render.
    pub fn get_text_term(&self, name: &Atom, form: TermForm, plural: bool) -> Option<&str> {
        let selector = TermSelector::new(name.clone(), form);
        let result = selector
            .fallback()
            .filter_map(|sel| self.terms.get(&sel))
            .next()
            .map(|content| content.get(plural));
        result
    }

    /// Overlay `with` on top of this locale. Term definitions in `with` win;
    /// anything it does not define is kept.
    pub fn merge(&mut self, with: &Self) {
        if with.lang.is_some() {
            self.lang = with.lang.clone();
        }
        self.terms
            .extend(with.terms.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

pub(crate) fn lang_attribute(node: &Node) -> Result<Option<Lang>, InvalidCsl> {
    match node.attribute((XML_NAMESPACE, "lang")) {
        Some(value) => Lang::from_str(value)
            .map(Some)
            .map_err(|_| InvalidCsl::new(node, format!("invalid xml:lang \"{}\"", value))),
        None => Ok(None),
    }
}

impl FromNode for Locale {
    fn select_child(node: &Node) -> bool {
        node.has_tag_name("locale")
    }
    const CHILD_DESC: &'static str = "locale";

    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self> {
        if node.tag_name().name() != "locale" {
            return Err(CslError(vec![InvalidCsl {
                severity: Severity::Error,
                range: node.range(),
                message: format!(
                    "root node must be a `<locale>` node, was `<{}>` instead",
                    node.tag_name().name()
                ),
                hint: "".into(),
            }]));
        }

        let lang = lang_attribute(node)?;
        let version = node.attribute("version").unwrap_or("1.0").into();

        let mut terms = FnvHashMap::default();
        let terms_node = node.children().find(|el| el.has_tag_name("terms"));
        if let Some(tn) = terms_node {
            let els = tn
                .children()
                .filter(TermEl::select_child)
                .map(|n| TermEl::from_node(&n, info))
                .partition_results()?;
            for TermEl { selector, content } in els {
                terms.insert(selector, content);
            }
        }

        Ok(Locale {
            version,
            lang,
            terms,
        })
    }
}
