// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Walks a style's layout tree against one cite's reference and locale,
//! producing output-format builds. Pure: same inputs, same output.

use citekit_io::output::OutputFormat;
use citekit_io::{Cite, Reference};
use csl::{Affixes, Element, Formatting, Locale, Style, TextElement, TextSource, Variable};

/// Everything one cite needs in order to render.
pub(crate) struct CiteContext<'c, O: OutputFormat> {
    pub style: &'c Style,
    pub reference: &'c Reference,
    pub cite: &'c Cite,
    /// The merged locale for the reference's language.
    pub locale: &'c Locale,
    pub format: &'c O,
}

impl<'c, O: OutputFormat> CiteContext<'c, O> {
    /// Variable lookup. The locator comes from the cite, everything else
    /// from the reference.
    fn variable(&self, var: &Variable) -> Option<String> {
        if let Variable::Locator = var {
            return self
                .cite
                .locators
                .as_ref()
                .and_then(|ls| ls.single())
                .map(|l| l.locator.to_string());
        }
        self.reference.get(var).map(|v| v.to_string())
    }
}

/// Render one cite through the citation layout. The layout delimiter joins
/// the layout's own children; cluster-level joining is the caller's job.
pub(crate) fn built_cite<O: OutputFormat>(ctx: &CiteContext<O>) -> O::Build {
    let layout = &ctx.style.citation.layout;
    sequence(ctx, &layout.elements, &layout.delimiter.0, layout.formatting)
}

/// Render a list of elements and join the non-empty results with a
/// delimiter. A group whose children all render empty renders empty itself,
/// which suppresses its affixes and keeps delimiters from piling up.
fn sequence<O: OutputFormat>(
    ctx: &CiteContext<O>,
    elements: &[Element],
    delimiter: &str,
    formatting: Option<Formatting>,
) -> O::Build {
    let built: Vec<O::Build> = elements.iter().map(|el| render_element(ctx, el)).collect();
    ctx.format.group(built, delimiter, formatting)
}

fn render_element<O: OutputFormat>(ctx: &CiteContext<O>, element: &Element) -> O::Build {
    match element {
        Element::Text(text) => render_text(ctx, text),
        Element::Group(group) => {
            let built = sequence(ctx, &group.elements, &group.delimiter.0, group.formatting);
            affixed(ctx.format, built, &group.affixes)
        }
    }
}

fn render_text<O: OutputFormat>(ctx: &CiteContext<O>, text: &TextElement) -> O::Build {
    let fmt = ctx.format;
    let content = match &text.source {
        TextSource::Value(value) => fmt.text_node(value, text.formatting),
        TextSource::Variable(var) => match ctx.variable(var) {
            Some(ref val) if !val.is_empty() => fmt.text_node(val, text.formatting),
            _ => return fmt.plain(""),
        },
        TextSource::Term(name, form, plural) => {
            match ctx.locale.get_text_term(name, *form, *plural) {
                Some(term) if !term.is_empty() => fmt.text_node(term, text.formatting),
                _ => return fmt.plain(""),
            }
        }
        TextSource::Macro(name) => match ctx.style.macros.get(name) {
            // joined with no delimiter, like a transparent group
            Some(elements) => sequence(ctx, elements, "", text.formatting),
            // unreachable: validated at parse time
            None => return fmt.plain(""),
        },
    };
    affixed(fmt, content, &text.affixes)
}

/// Affixes attach only to non-empty content.
fn affixed<O: OutputFormat>(fmt: &O, build: O::Build, affixes: &Affixes) -> O::Build {
    if affixes.is_empty() || fmt.is_empty(&build) {
        return build;
    }
    use std::iter::once;
    fmt.seq(
        once(fmt.plain(&affixes.prefix))
            .chain(once(build))
            .chain(once(fmt.plain(&affixes.suffix))),
    )
}

/// Cite-level prefix/suffix, e.g. `see ` and `, passim`. Same suppression
/// rule as element affixes.
pub(crate) fn with_cite_affixes<O: OutputFormat>(
    fmt: &O,
    build: O::Build,
    cite: &Cite,
) -> O::Build {
    if fmt.is_empty(&build) || !cite.has_affix() {
        return build;
    }
    use std::iter::once;
    let prefix = cite.prefix.as_deref().unwrap_or("");
    let suffix = cite.suffix.as_deref().unwrap_or("");
    fmt.seq(
        once(fmt.plain(prefix))
            .chain(once(build))
            .chain(once(fmt.plain(suffix))),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use citekit_io::output::Markup;
    use citekit_io::NumberLike;
    use csl::{CslType, Locale, Style, EN_US};
    use pretty_assertions::assert_eq;

    fn style(xml: &str) -> Style {
        Style::parse(xml).unwrap()
    }

    fn reference() -> Reference {
        let mut refr = Reference::empty("citekey", CslType::Book);
        refr.set(Variable::Title, "Hello");
        refr
    }

    fn render(style: &Style, refr: &Reference, cite: &Cite, fmt: &Markup) -> String {
        let locale = Locale::parse(EN_US).unwrap();
        let ctx = CiteContext {
            style,
            reference: refr,
            cite,
            locale: &locale,
            format: fmt,
        };
        let built = built_cite(&ctx);
        with_cite_affixes(fmt, built, cite)
    }

    #[test]
    fn title_and_term() {
        let style = style(
            r#"<style class="in-text" version="1.0">
                <citation><layout delimiter=" ">
                    <text variable="title"/>
                    <text term="edition"/>
                </layout></citation>
            </style>"#,
        );
        let out = render(&style, &reference(), &Cite::basic("citekey"), &Markup::plain());
        assert_eq!(out, "Hello edition");
    }

    #[test]
    fn group_suppressed_when_all_children_empty() {
        let style = style(
            r#"<style class="in-text" version="1.0">
                <citation><layout delimiter=" ">
                    <text variable="title"/>
                    <group prefix="(" suffix=")">
                        <text term="does-not-exist"/>
                    </group>
                </layout></citation>
            </style>"#,
        );
        let out = render(&style, &reference(), &Cite::basic("citekey"), &Markup::plain());
        // the whole group vanishes, affixes included, and no stray delimiter
        assert_eq!(out, "Hello");
    }

    #[test]
    fn group_kept_when_one_child_renders() {
        let style = style(
            r#"<style class="in-text" version="1.0">
                <citation><layout delimiter=" ">
                    <group delimiter=", " prefix="(" suffix=")">
                        <text variable="title"/>
                        <text term="does-not-exist"/>
                    </group>
                </layout></citation>
            </style>"#,
        );
        let out = render(&style, &reference(), &Cite::basic("citekey"), &Markup::plain());
        assert_eq!(out, "(Hello)");
    }

    #[test]
    fn macro_expansion() {
        let style = style(
            r#"<style class="in-text" version="1.0">
                <macro name="title-block">
                    <group delimiter=" ">
                        <text variable="title"/>
                        <text term="edition" form="short"/>
                    </group>
                </macro>
                <citation><layout>
                    <text macro="title-block" prefix="[" suffix="]"/>
                </layout></citation>
            </style>"#,
        );
        let out = render(&style, &reference(), &Cite::basic("citekey"), &Markup::plain());
        assert_eq!(out, "[Hello ed.]");
    }

    #[test]
    fn locator_comes_from_the_cite() {
        let style = style(
            r#"<style class="in-text" version="1.0">
                <citation><layout delimiter=" ">
                    <text variable="title"/>
                    <text variable="locator" prefix="p. "/>
                </layout></citation>
            </style>"#,
        );
        let fmt = Markup::plain();
        let bare = render(&style, &reference(), &Cite::basic("citekey"), &fmt);
        assert_eq!(bare, "Hello");

        let cite: Cite =
            serde_json::from_str(r#"{ "id": "citekey", "locator": "54" }"#).unwrap();
        let pinned = render(&style, &reference(), &cite, &fmt);
        assert_eq!(pinned, "Hello p. 54");
    }

    #[test]
    fn cite_affixes_wrap_nonempty_output() {
        let style = style(
            r#"<style class="in-text" version="1.0">
                <citation><layout><text variable="title"/></layout></citation>
            </style>"#,
        );
        let cite: Cite = serde_json::from_str(
            r#"{ "id": "citekey", "prefix": "see ", "suffix": ", passim" }"#,
        )
        .unwrap();
        let out = render(&style, &reference(), &cite, &Markup::plain());
        assert_eq!(out, "see Hello, passim");

        // empty render attracts no affixes
        let empty_ref = Reference::empty("citekey", CslType::Book);
        let out = render(&style, &empty_ref, &cite, &Markup::plain());
        assert_eq!(out, "");
    }

    #[test]
    fn numeric_field_renders() {
        let style = style(
            r#"<style class="in-text" version="1.0">
                <citation><layout delimiter=" ">
                    <text variable="edition"/>
                    <text term="edition" form="short"/>
                </layout></citation>
            </style>"#,
        );
        let mut refr = Reference::empty("citekey", CslType::Book);
        refr.set(Variable::Edition, NumberLike::Num(2));
        let out = render(&style, &refr, &Cite::basic("citekey"), &Markup::plain());
        assert_eq!(out, "2 ed.");
    }
}
