// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::SmartString;
#[cfg(feature = "serde")]
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// An ordinary bibliographic field, as referenced by `<text variable="...">`
/// and as keyed in a reference's field map.
///
/// The common fields get their own variants; anything else lands in `Other`,
/// so harnesses can feed arbitrary fields without the parser rejecting them.
#[derive(Debug, Clone, Eq, PartialEq, Hash, EnumString)]
#[strum(serialize_all = "kebab_case")]
pub enum Variable {
    Title,
    TitleShort,
    ContainerTitle,
    CollectionTitle,
    OriginalTitle,
    Publisher,
    PublisherPlace,
    Edition,
    Volume,
    Issue,
    Number,
    Page,
    Locator,
    Genre,
    Medium,
    Note,
    Abstract,
    Archive,
    ArchiveLocation,
    Authority,
    CallNumber,
    Dimensions,
    EventPlace,
    Keyword,
    Source,
    Status,
    #[strum(serialize = "DOI")]
    DOI,
    #[strum(serialize = "ISBN")]
    ISBN,
    #[strum(serialize = "ISSN")]
    ISSN,
    #[strum(serialize = "URL")]
    URL,
    #[strum(default)]
    Other(SmartString),
}

impl Variable {
    pub fn as_str(&self) -> &str {
        match self {
            Variable::Title => "title",
            Variable::TitleShort => "title-short",
            Variable::ContainerTitle => "container-title",
            Variable::CollectionTitle => "collection-title",
            Variable::OriginalTitle => "original-title",
            Variable::Publisher => "publisher",
            Variable::PublisherPlace => "publisher-place",
            Variable::Edition => "edition",
            Variable::Volume => "volume",
            Variable::Issue => "issue",
            Variable::Number => "number",
            Variable::Page => "page",
            Variable::Locator => "locator",
            Variable::Genre => "genre",
            Variable::Medium => "medium",
            Variable::Note => "note",
            Variable::Abstract => "abstract",
            Variable::Archive => "archive",
            Variable::ArchiveLocation => "archive-location",
            Variable::Authority => "authority",
            Variable::CallNumber => "call-number",
            Variable::Dimensions => "dimensions",
            Variable::EventPlace => "event-place",
            Variable::Keyword => "keyword",
            Variable::Source => "source",
            Variable::Status => "status",
            Variable::DOI => "DOI",
            Variable::ISBN => "ISBN",
            Variable::ISSN => "ISSN",
            Variable::URL => "URL",
            Variable::Other(ref s) => s.as_str(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// The type of a bibliographic item, e.g. `book` or `article-journal`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, EnumString)]
#[strum(serialize_all = "kebab_case")]
pub enum CslType {
    Article,
    ArticleJournal,
    ArticleMagazine,
    ArticleNewspaper,
    Book,
    Chapter,
    Dataset,
    Entry,
    EntryDictionary,
    EntryEncyclopedia,
    #[strum(serialize = "legal_case")]
    LegalCase,
    Legislation,
    Manuscript,
    Map,
    PaperConference,
    Report,
    Thesis,
    Webpage,
    #[strum(default)]
    Other(SmartString),
}

impl Default for CslType {
    fn default() -> Self {
        CslType::Article
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CslType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}
