// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use roxmltree::Node;
use std::fmt;
use std::ops::Range;

#[derive(Debug, PartialEq)]
pub struct UnknownAttributeValue {
    pub value: String,
}

impl UnknownAttributeValue {
    pub fn new(s: &str) -> Self {
        UnknownAttributeValue {
            value: s.to_owned(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum StyleError {
    #[error("invalid style: {0}")]
    Invalid(#[from] CslError),
    #[error("could not parse style: {0}")]
    ParseError(#[from] roxmltree::Error),
}

#[derive(Debug, PartialEq)]
pub struct CslError(pub Vec<InvalidCsl>);

impl std::error::Error for CslError {}

impl fmt::Display for CslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in &self.0 {
            writeln!(f, "bytes {}..{} {}", i.range.start, i.range.end, i)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(thiserror::Error, Debug, PartialEq, Clone)]
#[error("[{severity:?}] {message} ({hint})")]
pub struct InvalidCsl {
    pub severity: Severity,
    pub range: Range<usize>,
    pub message: String,
    pub hint: String,
}

impl InvalidCsl {
    pub fn new(node: &Node, message: impl Into<String>) -> Self {
        let range = node.range();
        InvalidCsl {
            range,
            severity: Severity::Error,
            hint: "".to_string(),
            message: message.into(),
        }
    }

    pub fn missing(node: &Node, attr: &str) -> Self {
        InvalidCsl::new(node, format!("Must have `{}` attribute", attr))
    }

    pub fn attr_val(node: &Node, attr: &str, uav: &str) -> Self {
        let range = node
            .attribute_node(attr)
            .map(|a| a.range())
            .unwrap_or_else(|| node.range());
        InvalidCsl {
            range,
            message: format!("Unknown attribute value for `{}`: \"{}\"", attr, uav),
            hint: "".to_string(),
            severity: Severity::Error,
        }
    }

    pub fn unknown_element(parent: &Node, child: &Node) -> Self {
        let child_tag = child.tag_name().name();
        let parent_tag = parent.tag_name().name();
        let range = child.range();
        InvalidCsl {
            range,
            message: format!(
                "Unknown element <{}> as child of <{}>",
                child_tag, parent_tag
            ),
            hint: "".to_string(),
            severity: Severity::Error,
        }
    }
}

impl From<Vec<CslError>> for CslError {
    fn from(errs: Vec<CslError>) -> CslError {
        // concat all of the sub-vecs into one
        let mut collect = Vec::with_capacity(errs.len());
        for err in errs {
            collect.extend_from_slice(&err.0);
        }
        CslError(collect)
    }
}

impl From<InvalidCsl> for CslError {
    fn from(err: InvalidCsl) -> CslError {
        CslError(vec![err])
    }
}

impl From<InvalidCsl> for StyleError {
    fn from(err: InvalidCsl) -> StyleError {
        StyleError::Invalid(CslError(vec![err]))
    }
}

pub(crate) trait PartitionResults<O, E>: Iterator<Item = Result<O, E>>
where
    O: Sized,
    Self: Sized,
{
    fn partition_results(self) -> Result<Vec<O>, Vec<E>> {
        let mut errors = Vec::new();
        let oks = self
            .filter_map(|res| match res {
                Ok(ok) => Some(ok),
                Err(e) => {
                    errors.push(e);
                    None
                }
            })
            .collect();
        if !errors.is_empty() {
            Err(errors)
        } else {
            Ok(oks)
        }
    }
}

impl<O, E, I: Iterator<Item = Result<O, E>>> PartitionResults<O, E> for I {}
