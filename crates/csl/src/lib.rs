// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parser and types for the citation style and locale markup dialect.
//!
//! The two entry points are [`Style::parse`] and [`Locale::parse`]. Both are
//! strict: malformed XML, unknown elements and unknown attribute values fail
//! with a [`StyleError`] carrying byte ranges into the input.

pub use smartstring::alias::String as SmartString;
pub use string_cache::DefaultAtom as Atom;

#[macro_use]
extern crate strum_macros;
#[macro_use]
extern crate log;

pub mod error;

mod attr;
mod from_node;
pub mod locale;
pub mod style;
pub mod terms;
pub mod variables;

pub use self::attr::GetAttribute;
pub use self::error::*;
pub use self::locale::*;
pub use self::style::*;
pub use self::terms::*;
pub use self::variables::*;
