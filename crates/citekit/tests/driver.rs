// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Whole-session tests: construct a driver, feed it references and
//! clusters, fetch locales, build output.

use async_trait::async_trait;
use citekit::prelude::*;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const STYLE: &str = r#"<style class="in-text" version="1.0">
  <citation>
    <layout delimiter=" ">
      <text variable="title"/>
      <text term="edition"/>
    </layout>
  </citation>
</style>"#;

const MULTI_CITE_STYLE: &str = r#"<style class="in-text" version="1.0">
  <citation>
    <layout delimiter="; " prefix="(" suffix=")">
      <text variable="title"/>
    </layout>
  </citation>
</style>"#;

const FR_LOCALE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<locale xmlns="http://purl.org/net/xbiblio/csl" version="1.0" xml:lang="fr-FR">
  <terms>
    <term name="edition">édition (fr)</term>
  </terms>
</locale>"#;

fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fr_lang() -> Lang {
    "fr-FR".parse().unwrap()
}

fn french_fetcher() -> Arc<PredefinedLocales> {
    let mut map = HashMap::new();
    map.insert(fr_lang(), FR_LOCALE.to_owned());
    Arc::new(PredefinedLocales(map))
}

fn reference(json: &str) -> Reference {
    serde_json::from_str(json).unwrap()
}

fn french_reference() -> Reference {
    reference(r#"{ "id": "citekey", "title": "Hello", "language": "fr-FR" }"#)
}

fn one_cluster(ref_id: &str) -> Vec<Cluster> {
    vec![Cluster {
        id: 1,
        cites: vec![Cite::basic(ref_id)],
    }]
}

/// Drives a session up to Ready with the given style, fetcher and format.
async fn ready_driver(
    style: &str,
    fetcher: Arc<dyn LocaleFetcher>,
    format: SupportedFormat,
    refs: Vec<Reference>,
    clusters: Vec<Cluster>,
) -> Driver {
    let mut driver = Driver::new(style, fetcher, format).unwrap();
    driver.insert_references(refs);
    let order: Vec<ClusterId> = clusters.iter().map(|c| c.id).collect();
    driver.init_clusters(clusters).unwrap();
    driver.set_cluster_order(&order).unwrap();
    driver.fetch_locales().await.unwrap();
    driver
}

#[tokio::test]
async fn french_edition_scenario_plain() {
    init_log();
    let driver = ready_driver(
        STYLE,
        french_fetcher(),
        SupportedFormat::Plain,
        vec![french_reference()],
        one_cluster("citekey"),
    )
    .await;
    assert_eq!(driver.build(1).unwrap(), "Hello édition (fr)");
}

#[tokio::test]
async fn french_edition_scenario_html() {
    let mut refr = french_reference();
    refr.set(Variable::Title, "Hello & <Friends>");
    let driver = ready_driver(
        STYLE,
        french_fetcher(),
        SupportedFormat::Html,
        vec![refr],
        one_cluster("citekey"),
    )
    .await;
    assert_eq!(
        driver.build(1).unwrap(),
        "Hello &amp; &lt;Friends&gt; édition (fr)"
    );
}

#[tokio::test]
async fn build_is_idempotent() {
    let driver = ready_driver(
        STYLE,
        french_fetcher(),
        SupportedFormat::Plain,
        vec![french_reference()],
        one_cluster("citekey"),
    )
    .await;
    let first = driver.build(1).unwrap();
    let second = driver.build(1).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn multi_cite_cluster_joins_with_layout_delimiter() {
    let refs = vec![
        reference(r#"{ "id": "a", "title": "Alpha" }"#),
        reference(r#"{ "id": "b", "title": "Beta" }"#),
    ];
    let clusters = vec![Cluster {
        id: 7,
        cites: vec![Cite::basic("a"), Cite::basic("b")],
    }];
    let driver = ready_driver(
        MULTI_CITE_STYLE,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
        refs,
        clusters,
    )
    .await;
    assert_eq!(driver.build(7).unwrap(), "(Alpha; Beta)");
}

#[tokio::test]
async fn missing_term_suppresses_group_but_not_siblings() {
    let style = r#"<style class="in-text" version="1.0">
      <citation>
        <layout delimiter=" ">
          <group delimiter=" "><text variable="title"/></group>
          <group prefix="[" suffix="]"><text term="no-such-term"/></group>
        </layout>
      </citation>
    </style>"#;
    let driver = ready_driver(
        style,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
        vec![reference(r#"{ "id": "a", "title": "Alpha" }"#)],
        one_cluster("a"),
    )
    .await;
    assert_eq!(driver.build(1).unwrap(), "Alpha");
}

#[tokio::test]
async fn html_formatting_wraps_in_tags() {
    let style = r#"<style class="in-text" version="1.0">
      <citation>
        <layout>
          <text variable="title" font-style="italic"/>
        </layout>
      </citation>
    </style>"#;
    let driver = ready_driver(
        style,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Html,
        vec![reference(r#"{ "id": "a", "title": "Alpha" }"#)],
        one_cluster("a"),
    )
    .await;
    assert_eq!(driver.build(1).unwrap(), "<i>Alpha</i>");
}

#[tokio::test]
async fn term_form_falls_back_to_long() {
    let style = r#"<style class="in-text" version="1.0">
      <citation>
        <layout>
          <text term="ibid" form="verb"/>
        </layout>
      </citation>
    </style>"#;
    let driver = ready_driver(
        style,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
        vec![reference(r#"{ "id": "a", "title": "Alpha" }"#)],
        one_cluster("a"),
    )
    .await;
    // bundled en-US defines no verb form for ibid
    assert_eq!(driver.build(1).unwrap(), "ibid.");
}

#[test]
fn malformed_style_fails_construction() {
    let err = Driver::new(
        "<style class=",
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
    )
    .map(|_| ())
    .unwrap_err();
    assert!(matches!(err, CiteError::MalformedStyle(_)));
}

#[test]
fn unknown_format_name_is_rejected() {
    assert!(matches!(
        "rtf".parse::<SupportedFormat>(),
        Err(CiteError::UnknownFormat(_))
    ));
    assert_eq!("html".parse::<SupportedFormat>().unwrap(), SupportedFormat::Html);
}

#[test]
fn reference_roundtrip_and_not_found() {
    let mut driver = Driver::new(
        STYLE,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
    )
    .unwrap();
    let refr = french_reference();
    driver.insert_references(vec![refr.clone()]);
    assert_eq!(driver.get_reference(&Atom::from("citekey")).unwrap(), &refr);
    assert!(matches!(
        driver.get_reference(&Atom::from("nope")),
        Err(CiteError::ReferenceNotFound(_))
    ));
}

#[test]
fn init_clusters_rejects_unknown_reference() {
    let mut driver = Driver::new(
        STYLE,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
    )
    .unwrap();
    driver.insert_references(vec![french_reference()]);
    let err = driver.init_clusters(one_cluster("never-inserted")).unwrap_err();
    assert!(matches!(err, CiteError::UnknownReference(id) if &*id == "never-inserted"));
    assert_eq!(driver.state(), SessionState::ReferencesLoaded);
}

#[test]
fn cluster_order_must_be_a_bijection() {
    let mut driver = Driver::new(
        STYLE,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
    )
    .unwrap();
    driver.insert_references(vec![
        reference(r#"{ "id": "a", "title": "Alpha" }"#),
        reference(r#"{ "id": "b", "title": "Beta" }"#),
    ]);
    driver
        .init_clusters(vec![
            Cluster { id: 1, cites: vec![Cite::basic("a")] },
            Cluster { id: 2, cites: vec![Cite::basic("b")] },
        ])
        .unwrap();

    // extra id
    assert!(matches!(
        driver.set_cluster_order(&[1, 2, 3]),
        Err(CiteError::OrderMismatch(_))
    ));
    // missing id
    assert!(matches!(
        driver.set_cluster_order(&[1]),
        Err(CiteError::OrderMismatch(_))
    ));
    // duplicate id
    assert!(matches!(
        driver.set_cluster_order(&[1, 1]),
        Err(CiteError::OrderMismatch(_))
    ));
    driver.set_cluster_order(&[2, 1]).unwrap();
    assert_eq!(driver.cluster_order(), &[2, 1]);
}

#[tokio::test]
async fn build_before_ready_fails() {
    let mut driver = Driver::new(
        STYLE,
        french_fetcher(),
        SupportedFormat::Plain,
    )
    .unwrap();
    assert!(matches!(
        driver.build(1),
        Err(CiteError::NotReady { .. })
    ));
    driver.insert_references(vec![french_reference()]);
    driver.init_clusters(one_cluster("citekey")).unwrap();
    // still not Ready: locales not fetched
    assert!(matches!(
        driver.build(1),
        Err(CiteError::NotReady { .. })
    ));
    driver.fetch_locales().await.unwrap();
    assert_eq!(driver.state(), SessionState::Ready);
    driver.build(1).unwrap();
}

#[tokio::test]
async fn fetch_locales_requires_clusters() {
    let mut driver = Driver::new(
        STYLE,
        french_fetcher(),
        SupportedFormat::Plain,
    )
    .unwrap();
    assert!(matches!(
        driver.fetch_locales().await,
        Err(CiteError::NotReady { .. })
    ));
}

#[tokio::test]
async fn failed_fetch_then_build_reports_locale_not_loaded() {
    init_log();
    struct NoLocales;
    #[async_trait]
    impl LocaleFetcher for NoLocales {
        async fn fetch_locale(&self, lang: &Lang) -> Result<String, LocaleFetchError> {
            Err(LocaleFetchError::Message(format!("offline: {}", lang)))
        }
    }

    let mut driver = Driver::new(STYLE, Arc::new(NoLocales), SupportedFormat::Plain).unwrap();
    driver.insert_references(vec![french_reference()]);
    driver.init_clusters(one_cluster("citekey")).unwrap();
    driver.set_cluster_order(&[1]).unwrap();

    let err = driver.fetch_locales().await.unwrap_err();
    assert!(matches!(err, CiteError::FetchFailure { ref lang, .. } if *lang == fr_lang()));

    // no silent render without the term: the locale is simply not loaded
    let err = driver.build(1).unwrap_err();
    assert!(matches!(err, CiteError::LocaleNotLoaded(ref lang) if *lang == fr_lang()));
}

#[tokio::test]
async fn malformed_locale_fails_bulk_fetch() {
    let mut map = HashMap::new();
    map.insert(fr_lang(), "<locale".to_owned());
    let fetcher = Arc::new(PredefinedLocales(map));

    let mut driver = Driver::new(STYLE, fetcher, SupportedFormat::Plain).unwrap();
    driver.insert_references(vec![french_reference()]);
    driver.init_clusters(one_cluster("citekey")).unwrap();
    let err = driver.fetch_locales().await.unwrap_err();
    assert!(matches!(err, CiteError::MalformedLocale { ref lang, .. } if *lang == fr_lang()));
}

#[tokio::test]
async fn locales_fetched_at_most_once_per_tag() {
    struct CountingFetcher {
        inner: PredefinedLocales,
        calls: AtomicUsize,
    }
    #[async_trait]
    impl LocaleFetcher for CountingFetcher {
        async fn fetch_locale(&self, lang: &Lang) -> Result<String, LocaleFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_locale(lang).await
        }
    }

    let mut map = HashMap::new();
    map.insert(fr_lang(), FR_LOCALE.to_owned());
    let fetcher = Arc::new(CountingFetcher {
        inner: PredefinedLocales(map),
        calls: AtomicUsize::new(0),
    });

    // two clusters, two cites, one distinct non-bundled language
    let refs = vec![
        french_reference(),
        reference(r#"{ "id": "other", "title": "Autre", "language": "fr-FR" }"#),
    ];
    let clusters = vec![
        Cluster { id: 1, cites: vec![Cite::basic("citekey")] },
        Cluster { id: 2, cites: vec![Cite::basic("other")] },
    ];
    let mut driver = Driver::new(STYLE, fetcher.clone(), SupportedFormat::Plain).unwrap();
    driver.insert_references(refs);
    driver.init_clusters(clusters).unwrap();
    driver.set_cluster_order(&[1, 2]).unwrap();

    driver.fetch_locales().await.unwrap();
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    // a second bulk fetch has nothing left to do
    driver.fetch_locales().await.unwrap();
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reinserting_a_reference_overwrites_it() {
    let mut driver = Driver::new(
        STYLE,
        french_fetcher(),
        SupportedFormat::Plain,
    )
    .unwrap();
    driver.insert_references(vec![french_reference()]);
    driver.init_clusters(one_cluster("citekey")).unwrap();
    driver.set_cluster_order(&[1]).unwrap();
    driver.fetch_locales().await.unwrap();
    assert_eq!(driver.build(1).unwrap(), "Hello édition (fr)");

    let replacement =
        reference(r#"{ "id": "citekey", "title": "Bonjour", "language": "fr-FR" }"#);
    driver.insert_references(vec![replacement]);
    assert_eq!(driver.build(1).unwrap(), "Bonjour édition (fr)");
}

#[tokio::test]
async fn unknown_cluster_id_is_not_found() {
    let driver = ready_driver(
        STYLE,
        french_fetcher(),
        SupportedFormat::Plain,
        vec![french_reference()],
        one_cluster("citekey"),
    )
    .await;
    assert!(matches!(
        driver.build(99),
        Err(CiteError::ClusterNotFound(99))
    ));
}

#[tokio::test]
async fn independent_drivers_do_not_interfere() {
    let a = ready_driver(
        STYLE,
        french_fetcher(),
        SupportedFormat::Plain,
        vec![french_reference()],
        one_cluster("citekey"),
    )
    .await;
    let b = ready_driver(
        MULTI_CITE_STYLE,
        Arc::new(PredefinedLocales::bundled_en_us()),
        SupportedFormat::Plain,
        vec![reference(r#"{ "id": "citekey", "title": "Elsewhere" }"#)],
        one_cluster("citekey"),
    )
    .await;
    assert_eq!(a.build(1).unwrap(), "Hello édition (fr)");
    assert_eq!(b.build(1).unwrap(), "(Elsewhere)");
}
