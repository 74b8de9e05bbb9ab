// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub mod markup;

pub use self::markup::Markup;

use csl::Formatting;

/// A target rendition for built citation text.
///
/// The renderer only ever hands raw text to `plain`/`text_node`, so a format
/// is responsible for all of its own escaping, and `Build` values are always
/// already escaped.
pub trait OutputFormat: Send + Sync + Clone + Default + std::fmt::Debug {
    type Build: std::fmt::Debug + Default + Clone + Send + Sync + PartialEq;
    type Output: Default + Clone + Send + Sync + PartialEq;

    /// Escaped literal text, no formatting.
    fn plain(&self, s: &str) -> Self::Build;

    /// Escaped text with character formatting applied.
    fn text_node(&self, s: &str, formatting: Option<Formatting>) -> Self::Build;

    /// Join some already-built nodes with a (raw, unescaped) delimiter and
    /// apply formatting around the whole group. Empty nodes are dropped
    /// before joining so delimiters never pile up.
    fn group(
        &self,
        nodes: Vec<Self::Build>,
        delimiter: &str,
        formatting: Option<Formatting>,
    ) -> Self::Build;

    fn join_delim(&self, a: Self::Build, delim: &str, b: Self::Build) -> Self::Build;

    fn seq(&self, nodes: impl Iterator<Item = Self::Build>) -> Self::Build;

    fn is_empty(&self, a: &Self::Build) -> bool;

    fn output(&self, intermediate: Self::Build) -> Self::Output;
}
