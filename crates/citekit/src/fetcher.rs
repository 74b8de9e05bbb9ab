// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use csl::{Lang, EN_US};
use std::collections::HashMap;

/// The capability the engine uses to retrieve locale XML for the languages
/// its references are written in. The transport is the caller's business:
/// network, filesystem, bundle, anything that can resolve a tag to a
/// document.
///
/// `fetch_locale` must not be assumed cheap or synchronous; the engine calls
/// it at most once per language tag per session.
#[async_trait]
pub trait LocaleFetcher: Send + Sync {
    async fn fetch_locale(&self, lang: &Lang) -> Result<String, LocaleFetchError>;
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LocaleFetchError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

/// A `LocaleFetcher` over a fixed in-memory table. Languages not in the
/// table fail the fetch.
pub struct PredefinedLocales(pub HashMap<Lang, String>);

impl PredefinedLocales {
    pub fn bundled_en_us() -> Self {
        let mut map = HashMap::new();
        map.insert(Lang::en_us(), String::from(EN_US));
        PredefinedLocales(map)
    }
}

#[async_trait]
impl LocaleFetcher for PredefinedLocales {
    async fn fetch_locale(&self, lang: &Lang) -> Result<String, LocaleFetchError> {
        self.0
            .get(lang)
            .cloned()
            .ok_or_else(|| LocaleFetchError::Message(format!("no locale available for {}", lang)))
    }
}
