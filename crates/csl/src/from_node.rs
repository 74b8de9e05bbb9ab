// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::error::{CslError, InvalidCsl};
use crate::SmartString;
use fnv::FnvHashSet;
use roxmltree::{Attribute, Node};

pub(crate) type FromNodeResult<T> = Result<T, CslError>;

/// Parse-wide context. Carries the set of `<macro>` names declared by the
/// style, so `<text macro="...">` references can be validated while parsing.
#[derive(Debug, Default)]
pub(crate) struct ParseInfo {
    pub(crate) macros: Option<FnvHashSet<SmartString>>,
}

pub(crate) trait FromNode
where
    Self: Sized,
{
    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self>;

    /// Used to filter a node's children and extract the relevant ones
    fn select_child(_child_node: &Node) -> bool {
        false
    }
    const CHILD_DESC: &'static str = "unimplemented";
}

pub(crate) fn exactly_one_child<T: FromNode>(
    node: &Node,
    info: &ParseInfo,
    errors: &mut Vec<InvalidCsl>,
) -> FromNodeResult<T> {
    let mut iter = node.children().filter(T::select_child);
    if let Some(child) = iter.next() {
        if iter.next().is_some() {
            errors.push(InvalidCsl::new(
                node,
                format!("Cannot have more than one <{}>", T::CHILD_DESC),
            ));
        }
        T::from_node(&child, info)
    } else {
        errors.push(InvalidCsl::new(
            node,
            format!("Must have exactly one <{}>", T::CHILD_DESC),
        ));
        Err(CslError(Vec::new()))
    }
}

pub(crate) trait AttrChecker
where
    Self: Sized,
{
    fn filter_attribute(attr: &str) -> bool;
    fn filter_attribute_full(a: &Attribute) -> bool {
        Self::filter_attribute(a.name())
    }
    fn is_on_node(node: &Node) -> bool {
        node.attributes()
            .iter()
            .any(|a| Self::filter_attribute_full(a))
    }
}

impl<T> FromNode for Option<T>
where
    T: AttrChecker + FromNode,
{
    fn from_node(node: &Node, info: &ParseInfo) -> FromNodeResult<Self> {
        if T::is_on_node(node) {
            Ok(Some(T::from_node(node, info)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
pub(crate) fn parse_as<T>(s: &str) -> FromNodeResult<T>
where
    T: FromNode,
{
    let doc = roxmltree::Document::parse(s).unwrap();
    T::from_node(&doc.root_element(), &ParseInfo::default())
}
