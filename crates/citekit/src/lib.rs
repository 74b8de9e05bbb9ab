// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A citation style processing engine.
//!
//! Construct a [`Driver`] with a style, a [`LocaleFetcher`] capability and an
//! output format; feed it references and citation clusters; await the bulk
//! locale fetch; then build formatted citation text per cluster. See the
//! [`Driver`] docs for a complete session.

#[macro_use]
extern crate log;

mod clusters;
mod driver;
pub mod error;
pub mod fetcher;
mod locales;
mod renderer;
mod store;

pub use crate::driver::{Driver, SessionState, SupportedFormat};
pub use crate::error::CiteError;
pub use crate::fetcher::{LocaleFetchError, LocaleFetcher, PredefinedLocales};

pub mod prelude {
    pub use crate::driver::{Driver, SessionState, SupportedFormat};
    pub use crate::error::CiteError;
    pub use crate::fetcher::{LocaleFetchError, LocaleFetcher, PredefinedLocales};
    pub use citekit_io::output::{Markup, OutputFormat};
    pub use citekit_io::{Cite, Cluster, ClusterId, NumberLike, Reference};
    pub use csl::{Atom, CslType, Lang, Style, StyleError, Variable};
}
