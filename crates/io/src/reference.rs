// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::NumberLike;
use csl::{Atom, CslType, Lang, Variable};
use fnv::FnvHashMap;
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use std::fmt;

/// A bibliographic entry, addressable by a unique id.
///
/// Every field that is not `id`, `type` or `language` lands in the `ordinary`
/// map, keyed by [`Variable`] so the common fields are cheap and arbitrary
/// ones still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    #[serde(deserialize_with = "get_ref_id")]
    pub id: Atom,
    #[serde(rename = "type", default)]
    pub csl_type: CslType,
    #[serde(default)]
    pub language: Option<Lang>,
    #[serde(flatten)]
    pub ordinary: FieldMap,
}

impl Reference {
    pub fn empty(id: impl Into<Atom>, csl_type: CslType) -> Reference {
        Reference {
            id: id.into(),
            csl_type,
            language: None,
            ordinary: FieldMap::default(),
        }
    }

    pub fn get(&self, var: &Variable) -> Option<&NumberLike> {
        self.ordinary.0.get(var)
    }

    pub fn set(&mut self, var: Variable, value: impl Into<NumberLike>) {
        self.ordinary.0.insert(var, value.into());
    }
}

/// Technically reference IDs are allowed to be numbers.
pub(crate) fn get_ref_id<'de, D>(d: D) -> Result<Atom, D::Error>
where
    D: Deserializer<'de>,
{
    let s = NumberLike::deserialize(d)?;
    Ok(Atom::from(s.into_string()))
}

/// The ordinary-field map. Scalar values (strings, numbers) are kept;
/// structured values the renderer has no use for are skipped, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMap(pub FnvHashMap<Variable, NumberLike>);

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarOrSkip {
    Scalar(NumberLike),
    Skipped(IgnoredAny),
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FieldMapVisitor;
        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;
            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of bibliographic fields")
            }
            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut map = FnvHashMap::default();
                while let Some(key) = access.next_key::<Variable>()? {
                    match access.next_value::<ScalarOrSkip>()? {
                        ScalarOrSkip::Scalar(value) => {
                            map.insert(key, value);
                        }
                        ScalarOrSkip::Skipped(_) => {
                            debug!("skipping non-scalar field {}", key);
                        }
                    }
                }
                Ok(FieldMap(map))
            }
        }
        deserializer.deserialize_map(FieldMapVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use csl::IsoLang;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_reference() {
        let json = r#"{
            "id": "citekey",
            "type": "book",
            "language": "fr-FR",
            "title": "Hello",
            "publisher-place": "Lyon",
            "edition": 2
        }"#;
        let refr: Reference = serde_json::from_str(json).unwrap();
        assert_eq!(refr.id, Atom::from("citekey"));
        assert_eq!(refr.csl_type, CslType::Book);
        assert_eq!(
            refr.language,
            Some(Lang::Iso(IsoLang::French, Some(csl::IsoCountry::FR)))
        );
        assert_eq!(
            refr.get(&Variable::Title),
            Some(&NumberLike::Str("Hello".into()))
        );
        assert_eq!(refr.get(&Variable::Edition), Some(&NumberLike::Num(2)));
    }

    #[test]
    fn numeric_id_and_unknown_fields() {
        let json = r#"{
            "id": 42,
            "title": "T",
            "my-custom-field": "kept",
            "author": [{"family": "Smith"}]
        }"#;
        let refr: Reference = serde_json::from_str(json).unwrap();
        assert_eq!(refr.id, Atom::from("42"));
        assert_eq!(refr.csl_type, CslType::Article);
        assert_eq!(
            refr.get(&Variable::Other("my-custom-field".into())),
            Some(&NumberLike::Str("kept".into()))
        );
        // structured author value is skipped, not a failure
        assert_eq!(refr.get(&Variable::Other("author".into())), None);
    }
}
