// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use csl::{Lang, Locale, LocaleSource, Style, StyleError, EN_US};
use fnv::FnvHashMap;
use std::sync::Arc;

/// Cache of parsed locales, keyed by language tag, owned by one driver.
/// Content for a given tag is stateless, so entries are never invalidated.
pub(crate) struct LocalePool {
    cache: FnvHashMap<Lang, Arc<Locale>>,
}

impl LocalePool {
    /// A pool with the bundled `en-US` base locale pre-stored, so the tail of
    /// every inheritance chain is always available.
    pub fn bundled_en_us() -> Result<Self, StyleError> {
        let base = Locale::parse(EN_US)?;
        let mut cache = FnvHashMap::default();
        cache.insert(Lang::en_us(), Arc::new(base));
        Ok(LocalePool { cache })
    }

    pub fn contains(&self, lang: &Lang) -> bool {
        self.cache.contains_key(lang)
    }

    pub fn store(&mut self, lang: Lang, locale: Locale) {
        debug!("caching locale {}", lang);
        self.cache.insert(lang, Arc::new(locale));
    }

    /// Derives the lang's full inheritance chain and merges it into one
    /// locale: the bundled base underneath, then fetched files, then the
    /// style's inline overrides, most specific last (winning).
    ///
    /// Chain members that are not cached (e.g. a dialect file nobody
    /// fetched) are skipped; whether the *requested* tag itself must be
    /// cached is the caller's check.
    pub fn merged<'a>(&'a self, lang: &Lang, style: &'a Style) -> Locale {
        let chain: Vec<&Locale> = lang
            .iter()
            .filter_map(|source| match source {
                LocaleSource::Inline(key) => style.locale_overrides.get(&key),
                LocaleSource::File(l) => self.cache.get(&l).map(|arc| arc.as_ref()),
            })
            .collect();
        let mut merged = Locale::default();
        for locale in chain.into_iter().rev() {
            merged.merge(locale);
        }
        merged
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use csl::{Atom, TermForm};

    fn style(xml: &str) -> Style {
        Style::parse(xml).unwrap()
    }

    const BARE_STYLE: &str = r#"<style class="in-text" version="1.0">
        <citation><layout><text variable="title"/></layout></citation>
    </style>"#;

    fn term(locale: &Locale, name: &str) -> Option<String> {
        locale
            .get_text_term(&Atom::from(name), TermForm::Long, false)
            .map(String::from)
    }

    #[test]
    fn merged_reaches_base_terms() {
        let pool = LocalePool::bundled_en_us().unwrap();
        let style = style(BARE_STYLE);
        let fr: Lang = "fr-FR".parse().unwrap();
        // nothing fetched for fr-FR, but the base still provides terms
        let merged = pool.merged(&fr, &style);
        assert_eq!(term(&merged, "edition").as_deref(), Some("edition"));
    }

    #[test]
    fn fetched_file_beats_base() {
        let mut pool = LocalePool::bundled_en_us().unwrap();
        let style = style(BARE_STYLE);
        let fr: Lang = "fr-FR".parse().unwrap();
        let fr_locale = Locale::parse(
            r#"<locale xml:lang="fr-FR"><terms>
                <term name="edition">édition (fr)</term>
            </terms></locale>"#,
        )
        .unwrap();
        pool.store(fr.clone(), fr_locale);
        let merged = pool.merged(&fr, &style);
        assert_eq!(term(&merged, "edition").as_deref(), Some("édition (fr)"));
        // terms the override does not define still come from the base
        assert_eq!(term(&merged, "and").as_deref(), Some("and"));
    }

    #[test]
    fn inline_override_beats_fetched_file() {
        let mut pool = LocalePool::bundled_en_us().unwrap();
        let style = style(
            r#"<style class="in-text" version="1.0">
                <locale xml:lang="fr-FR">
                    <terms><term name="edition">édition (inline)</term></terms>
                </locale>
                <citation><layout><text variable="title"/></layout></citation>
            </style>"#,
        );
        let fr: Lang = "fr-FR".parse().unwrap();
        let fr_locale = Locale::parse(
            r#"<locale xml:lang="fr-FR"><terms>
                <term name="edition">édition (fichier)</term>
            </terms></locale>"#,
        )
        .unwrap();
        pool.store(fr.clone(), fr_locale);
        let merged = pool.merged(&fr, &style);
        assert_eq!(term(&merged, "edition").as_deref(), Some("édition (inline)"));
    }
}
