// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::{InvalidCsl, UnknownAttributeValue};
use crate::Atom;
use roxmltree::Node;
use std::str::FromStr;

pub trait GetAttribute
where
    Self: Sized,
{
    fn get_attr(s: &str) -> Result<Self, UnknownAttributeValue>;
}

impl<T: FromStr> GetAttribute for T {
    fn get_attr(s: &str) -> Result<Self, UnknownAttributeValue> {
        T::from_str(s).map_err(|_| UnknownAttributeValue::new(s))
    }
}

pub(crate) fn attribute_bool(
    node: &Node,
    attr: &'static str,
    default: bool,
) -> Result<bool, InvalidCsl> {
    match node.attribute(attr) {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        None => Ok(default),
        Some(s) => Err(InvalidCsl::attr_val(node, attr, s)),
    }
}

pub(crate) fn attribute_atom(node: &Node, attr: &'static str) -> Atom {
    node.attribute(attr)
        .map(Atom::from)
        .unwrap_or_else(|| Atom::from(""))
}

pub(crate) fn attribute_option_atom(node: &Node, attr: &'static str) -> Option<Atom> {
    node.attribute(attr).map(Atom::from)
}

pub(crate) fn attribute_required<T: GetAttribute>(
    node: &Node,
    attr: &'static str,
) -> Result<T, InvalidCsl> {
    match node.attribute(attr) {
        Some(a) => match T::get_attr(a) {
            Ok(val) => Ok(val),
            Err(e) => Err(InvalidCsl::attr_val(node, attr, &e.value)),
        },
        None => Err(InvalidCsl::missing(node, attr)),
    }
}

pub(crate) fn attribute_option<T: GetAttribute>(
    node: &Node,
    attr: &'static str,
) -> Result<Option<T>, InvalidCsl> {
    match node.attribute(attr) {
        Some(a) => match T::get_attr(a) {
            Ok(val) => Ok(Some(val)),
            Err(e) => Err(InvalidCsl::attr_val(node, attr, &e.value)),
        },
        None => Ok(None),
    }
}

pub(crate) fn attribute_optional<T: Default + GetAttribute>(
    node: &Node,
    attr: &'static str,
) -> Result<T, InvalidCsl> {
    match node.attribute(attr) {
        Some(a) => match T::get_attr(a) {
            Ok(val) => Ok(val),
            Err(e) => Err(InvalidCsl::attr_val(node, attr, &e.value)),
        },
        None => Ok(T::default()),
    }
}
