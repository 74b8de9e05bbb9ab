// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use super::OutputFormat;
use csl::{Formatting, FontStyle, FontWeight};

/// The built-in output formats. One type rather than one type per format, so
/// an engine can pick a format at runtime while the renderer stays generic
/// over [`OutputFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Plain,
    Html,
}

impl Default for Markup {
    fn default() -> Self {
        Markup::Plain
    }
}

impl Markup {
    pub fn plain() -> Self {
        Markup::Plain
    }
    pub fn html() -> Self {
        Markup::Html
    }

    fn escape(&self, s: &str) -> String {
        match self {
            Markup::Plain => s.to_owned(),
            Markup::Html => v_htmlescape::escape(s).to_string(),
        }
    }

    fn wrap(&self, s: String, formatting: Option<Formatting>) -> String {
        let formatting = match (self, formatting) {
            (Markup::Html, Some(f)) => f,
            _ => return s,
        };
        if s.is_empty() {
            return s;
        }
        let mut out = s;
        if let Some(FontStyle::Italic) | Some(FontStyle::Oblique) = formatting.font_style {
            out = format!("<i>{}</i>", out);
        }
        if let Some(FontWeight::Bold) = formatting.font_weight {
            out = format!("<b>{}</b>", out);
        }
        out
    }
}

impl OutputFormat for Markup {
    type Build = String;
    type Output = String;

    #[inline]
    fn plain(&self, s: &str) -> Self::Build {
        self.escape(s)
    }

    #[inline]
    fn text_node(&self, s: &str, formatting: Option<Formatting>) -> Self::Build {
        self.wrap(self.escape(s), formatting)
    }

    fn group(
        &self,
        nodes: Vec<Self::Build>,
        delimiter: &str,
        formatting: Option<Formatting>,
    ) -> Self::Build {
        let delim = self.escape(delimiter);
        let joined = nodes
            .into_iter()
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(&delim);
        self.wrap(joined, formatting)
    }

    fn join_delim(&self, mut a: Self::Build, delim: &str, b: Self::Build) -> Self::Build {
        if a.is_empty() {
            return b;
        }
        if b.is_empty() {
            return a;
        }
        a.push_str(&self.escape(delim));
        a.push_str(&b);
        a
    }

    fn seq(&self, nodes: impl Iterator<Item = Self::Build>) -> Self::Build {
        let mut out = String::new();
        for node in nodes {
            out.push_str(&node);
        }
        out
    }

    #[inline]
    fn is_empty(&self, a: &Self::Build) -> bool {
        a.is_empty()
    }

    #[inline]
    fn output(&self, intermediate: Self::Build) -> Self::Output {
        intermediate
    }
}
