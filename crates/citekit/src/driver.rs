// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::clusters::ClusterGraph;
use crate::error::CiteError;
use crate::fetcher::LocaleFetcher;
use crate::locales::LocalePool;
use crate::renderer::{built_cite, with_cite_affixes, CiteContext};
use crate::store::ReferenceStore;
use citekit_io::output::{Markup, OutputFormat};
use citekit_io::{Cluster, ClusterId, Reference};
use csl::{Atom, Lang, Locale, Style};
use fnv::FnvHashSet;
use futures::future::try_join_all;
use std::str::FromStr;
use std::sync::Arc;

/// How far a driver session has progressed. `build` is only available once
/// the session is `Ready`; everything earlier fails fast with
/// [`CiteError::NotReady`] rather than rendering from partial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    StyleLoaded,
    ReferencesLoaded,
    ClustersInitialized,
    Ready,
}

/// Output format selector, chosen at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFormat {
    Plain,
    Html,
}

impl FromStr for SupportedFormat {
    type Err = CiteError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(SupportedFormat::Plain),
            "html" => Ok(SupportedFormat::Html),
            _ => Err(CiteError::UnknownFormat(s.to_owned())),
        }
    }
}

fn markup_supported(format: SupportedFormat) -> Markup {
    match format {
        SupportedFormat::Plain => Markup::plain(),
        SupportedFormat::Html => Markup::html(),
    }
}

/// The façade a document harness drives.
///
/// One driver is one logical session: it owns the parsed style, the
/// reference store, the cluster graph and the locale cache, and borrows the
/// fetch capability only while `fetch_locales` is in flight. Drivers share
/// nothing, so any number can coexist in a process.
///
/// ```
/// # use citekit::prelude::*;
/// # use std::sync::Arc;
/// # fn main() -> Result<(), CiteError> {
/// # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// # rt.block_on(async {
/// let style = r#"<style class="in-text" version="1.0">
///     <citation><layout delimiter="; ">
///         <text variable="title"/>
///     </layout></citation>
/// </style>"#;
/// let fetcher = Arc::new(PredefinedLocales::bundled_en_us());
/// let mut driver = Driver::new(style, fetcher, SupportedFormat::Plain)?;
/// driver.insert_references(vec![serde_json::from_str(
///     r#"{ "id": "smith", "type": "book", "title": "A Book" }"#).unwrap()]);
/// driver.init_clusters(vec![Cluster { id: 1, cites: vec![Cite::basic("smith")] }])?;
/// driver.set_cluster_order(&[1])?;
/// driver.fetch_locales().await?;
/// assert_eq!(driver.build(1)?, "A Book");
/// # Ok(())
/// # })
/// # }
/// ```
pub struct Driver {
    style: Arc<Style>,
    formatter: Markup,
    fetcher: Arc<dyn LocaleFetcher>,
    store: ReferenceStore,
    clusters: ClusterGraph,
    locales: LocalePool,
    state: SessionState,
}

impl Driver {
    /// Parses the style eagerly; a malformed style fails construction and
    /// nothing else happens. Locales are not fetched here.
    pub fn new(
        style_text: &str,
        fetcher: Arc<dyn LocaleFetcher>,
        format: SupportedFormat,
    ) -> Result<Self, CiteError> {
        let style = Style::parse(style_text)?;
        let locales = LocalePool::bundled_en_us().map_err(|source| CiteError::MalformedLocale {
            lang: Lang::en_us(),
            source,
        })?;
        Ok(Driver {
            style: Arc::new(style),
            formatter: markup_supported(format),
            fetcher,
            store: ReferenceStore::default(),
            clusters: ClusterGraph::default(),
            locales,
            state: SessionState::StyleLoaded,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn advance(&mut self, to: SessionState) {
        if self.state < to {
            self.state = to;
        }
    }

    /// Inserts or overwrites references as a batch. Re-inserting an id
    /// replaces the previous entry.
    pub fn insert_references(&mut self, refs: Vec<Reference>) {
        self.store.upsert_all(refs);
        self.advance(SessionState::ReferencesLoaded);
    }

    pub fn get_reference(&self, id: &Atom) -> Result<&Reference, CiteError> {
        self.store
            .get(id)
            .ok_or_else(|| CiteError::ReferenceNotFound(id.clone()))
    }

    /// Replaces the full set of clusters. Fails with `UnknownReference`, and
    /// changes nothing, if any cite names a reference that was never
    /// inserted.
    pub fn init_clusters(&mut self, clusters: Vec<Cluster>) -> Result<(), CiteError> {
        self.clusters.init(clusters, &self.store)?;
        self.advance(SessionState::ClustersInitialized);
        Ok(())
    }

    /// Defines the total order over cluster ids; must be a bijection with
    /// the ids currently in the graph.
    pub fn set_cluster_order(&mut self, ids: &[ClusterId]) -> Result<(), CiteError> {
        self.clusters.set_order(ids)
    }

    /// The current total order, as last set by `init_clusters` or
    /// `set_cluster_order`.
    pub fn cluster_order(&self) -> &[ClusterId] {
        self.clusters.order()
    }

    /// Every language tag the current references and style can ask for
    /// during rendering. Sorted, deduplicated.
    pub fn langs_in_use(&self) -> Vec<Lang> {
        let mut langs: FnvHashSet<Lang> = self
            .clusters
            .iter()
            .flat_map(|cluster| cluster.cites.iter())
            .filter_map(|cite| self.store.get(&cite.ref_id))
            .filter_map(|refr| refr.language.clone())
            .collect();
        langs.insert(self.style.default_locale.clone());
        let mut langs: Vec<Lang> = langs.into_iter().collect();
        langs.sort();
        langs
    }

    pub fn has_cached_locale(&self, lang: &Lang) -> bool {
        self.locales.contains(lang)
    }

    fn langs_to_fetch(&self) -> Vec<Lang> {
        self.langs_in_use()
            .into_iter()
            .filter(|lang| !self.locales.contains(lang))
            .collect()
    }

    /// Fetches and caches every locale the current clusters can need, one
    /// fetch per distinct uncached tag, concurrently. Resolves after all
    /// fetches parse and store, or fails on the first fetch or parse error
    /// without retrying and without storing partial results.
    pub async fn fetch_locales(&mut self) -> Result<(), CiteError> {
        if self.state < SessionState::ClustersInitialized {
            return Err(CiteError::NotReady {
                needed: SessionState::ClustersInitialized,
                actual: self.state,
            });
        }
        let langs = self.langs_to_fetch();
        debug!("fetching {} locale(s): {:?}", langs.len(), langs);
        let fetcher = self.fetcher.clone();
        let fetches = langs.into_iter().map(|lang| {
            let fetcher = fetcher.clone();
            async move {
                let xml = fetcher.fetch_locale(&lang).await.map_err(|source| {
                    CiteError::FetchFailure {
                        lang: lang.clone(),
                        source,
                    }
                })?;
                let locale =
                    Locale::parse(&xml).map_err(|source| CiteError::MalformedLocale {
                        lang: lang.clone(),
                        source,
                    })?;
                Ok::<(Lang, Locale), CiteError>((lang, locale))
            }
        });
        let pairs = try_join_all(fetches).await?;
        for (lang, locale) in pairs {
            self.locales.store(lang, locale);
        }
        self.advance(SessionState::Ready);
        Ok(())
    }

    /// Returns the formatted citation text for one cluster.
    ///
    /// Pure with respect to the session state: two calls without an
    /// intervening mutation return identical strings.
    pub fn build(&self, cluster_id: ClusterId) -> Result<String, CiteError> {
        if self.state < SessionState::Ready {
            return Err(CiteError::NotReady {
                needed: SessionState::Ready,
                actual: self.state,
            });
        }
        let cluster = self
            .clusters
            .get(cluster_id)
            .ok_or(CiteError::ClusterNotFound(cluster_id))?;

        let fmt = &self.formatter;
        let layout = &self.style.citation.layout;
        let mut cite_builds = Vec::with_capacity(cluster.cites.len());
        for cite in &cluster.cites {
            let refr = self
                .store
                .get(&cite.ref_id)
                .ok_or_else(|| CiteError::UnknownReference(cite.ref_id.clone()))?;
            let lang = refr
                .language
                .clone()
                .unwrap_or_else(|| self.style.default_locale.clone());
            if !self.locales.contains(&lang) {
                return Err(CiteError::LocaleNotLoaded(lang));
            }
            let locale = self.locales.merged(&lang, &self.style);
            let ctx = CiteContext {
                style: &self.style,
                reference: refr,
                cite,
                locale: &locale,
                format: fmt,
            };
            let built = built_cite(&ctx);
            cite_builds.push(with_cite_affixes(fmt, built, cite));
        }

        let joined = fmt.group(cite_builds, &layout.delimiter.0, None);
        let built = if fmt.is_empty(&joined) || layout.affixes.is_empty() {
            joined
        } else {
            use std::iter::once;
            fmt.seq(
                once(fmt.plain(&layout.affixes.prefix))
                    .chain(once(joined))
                    .chain(once(fmt.plain(&layout.affixes.suffix))),
            )
        };
        Ok(fmt.output(built))
    }
}
