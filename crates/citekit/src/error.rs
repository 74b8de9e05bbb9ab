// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::driver::SessionState;
use crate::fetcher::LocaleFetchError;
use citekit_io::ClusterId;
use csl::{Atom, Lang, StyleError};

/// Everything the engine can report to a caller.
///
/// Structural errors (`MalformedStyle`, `UnknownReference`, `OrderMismatch`)
/// surface synchronously and are never silently recovered; the fetch errors
/// (`FetchFailure`, `MalformedLocale`) abort an in-flight bulk fetch and are
/// not retried internally.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CiteError {
    #[error("invalid style: {0}")]
    MalformedStyle(#[from] StyleError),

    #[error("invalid locale {lang}: {source}")]
    MalformedLocale { lang: Lang, source: StyleError },

    #[error("could not fetch locale {lang}: {source}")]
    FetchFailure {
        lang: Lang,
        source: LocaleFetchError,
    },

    #[error("unknown reference id \"{0}\"")]
    UnknownReference(Atom),

    #[error("cluster order mismatch: {0}")]
    OrderMismatch(String),

    #[error("locale {0} has not been fetched")]
    LocaleNotLoaded(Lang),

    #[error("driver is {actual:?} but this operation requires {needed:?}")]
    NotReady {
        needed: SessionState,
        actual: SessionState,
    },

    #[error("cluster {0} does not exist")]
    ClusterNotFound(ClusterId),

    #[error("reference \"{0}\" does not exist")]
    ReferenceNotFound(Atom),

    #[error("unknown output format \"{0}\"")]
    UnknownFormat(String),
}
