// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Boundary types for the citekit engine: bibliographic references, cites,
//! clusters, and the output formats rendered text is produced in.

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

mod cite;
mod cluster;
pub mod output;
mod reference;

pub use cite::*;
pub use cluster::*;
pub use reference::*;

use smartstring::alias::String as SmartString;
use std::fmt;

/// A value that may arrive as either a JSON string or a JSON number.
/// Reference ids and locator values are allowed to be numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Str(SmartString),
    Num(i64),
}

impl NumberLike {
    pub fn into_string(self) -> String {
        match self {
            NumberLike::Str(s) => s.into(),
            NumberLike::Num(n) => n.to_string(),
        }
    }
}

impl fmt::Display for NumberLike {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumberLike::Str(s) => f.write_str(s),
            NumberLike::Num(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for NumberLike {
    fn from(s: &str) -> Self {
        NumberLike::Str(s.into())
    }
}
