// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::reference::get_ref_id;
use crate::NumberLike;
use csl::Atom;
use serde::de::{Deserialize, Deserializer};

fn default_label() -> Atom {
    Atom::from("page")
}

/// A pinpoint location inside a cited reference; the label names the term
/// used to render it ("page", "chapter", ...).
#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize)]
pub struct Locator {
    pub locator: NumberLike,
    #[serde(default = "default_label", rename = "label")]
    pub label: Atom,
}

/// Represents one cite in someone's document, to exactly one reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cite {
    #[serde(rename = "id", deserialize_with = "get_ref_id")]
    pub ref_id: Atom,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub suffix: Option<String>,

    #[serde(default, flatten, deserialize_with = "get_locators")]
    pub locators: Option<Locators>,
}

/// Accepts either
/// `{ "locator": "54", "label": "page" }` or
/// `{ "locators": [{"label": "chapter", "locator": "19"}, ...] }`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Locators {
    Single(Locator),
    Multiple { locators: Vec<Locator> },
}

impl Locators {
    pub fn single(&self) -> Option<&Locator> {
        match self {
            Locators::Single(l) => Some(l),
            Locators::Multiple { locators } => locators.get(0),
        }
    }
    fn into_option(self) -> Option<Self> {
        match self {
            Locators::Multiple { locators } => {
                if locators.is_empty() {
                    None
                } else if locators.len() == 1 {
                    locators.into_iter().next().map(Locators::Single)
                } else {
                    Some(Locators::Multiple { locators })
                }
            }
            l => Some(l),
        }
    }
}

/// Single length locator arrays => Some(Locators::Single)
/// Zero length => None
fn get_locators<'de, D>(d: D) -> Result<Option<Locators>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Locators>::deserialize(d)?.and_then(|me| me.into_option()))
}

impl Cite {
    pub fn basic(ref_id: impl Into<Atom>) -> Self {
        Cite {
            ref_id: ref_id.into(),
            prefix: None,
            suffix: None,
            locators: None,
        }
    }

    pub fn has_affix(&self) -> bool {
        self.prefix.is_some() || self.suffix.is_some()
    }
}
