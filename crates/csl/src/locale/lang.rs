// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::SmartString;
#[cfg(feature = "serde")]
use serde::Deserialize;
use std::fmt;
use std::mem;
use std::str::FromStr;

/// One step in a locale inheritance chain: either an inline `<locale>`
/// defined in the style (keyed by an optional lang), or a fetched locale
/// file for a concrete lang.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum LocaleSource {
    Inline(Option<Lang>),
    File(Lang),
}

/// A parsable representation of `xml:lang`.
///
/// See http://www.datypic.com/sc/xsd/t-xsd_language.html
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Lang {
    /// ISO 639 language code, + optional hyphen and 2-letter ISO 3166 country code.
    ///
    /// i.e. `en` or `en-US`
    Iso(IsoLang, Option<IsoCountry>),
    /// IANA-assigned language codes
    Iana(SmartString),
    /// Agreed upon language ID (max 8 characters). You'll have to provide
    /// your own locale file for these.
    Unofficial(SmartString),
}

impl Default for Lang {
    fn default() -> Self {
        Lang::en_us()
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Lang::Iso(l, None) => write!(f, "{}", l),
            Lang::Iso(l, Some(c)) => write!(f, "{}-{}", l, c),
            Lang::Iana(u) => write!(f, "i-{}", u),
            Lang::Unofficial(u) => write!(f, "x-{}", u),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Lang {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Lang {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl Lang {
    pub fn en_us() -> Self {
        Lang::Iso(IsoLang::English, Some(IsoCountry::US))
    }

    /// The full locale inheritance chain for this lang: inline style locales
    /// first (most specific wins later, during the merge fold), then locale
    /// files down to en-US.
    pub fn iter(&self) -> impl Iterator<Item = LocaleSource> {
        use std::iter::once;
        self.inline_iter()
            .map(Some)
            .chain(once(None))
            .map(LocaleSource::Inline)
            .chain(self.file_iter().map(LocaleSource::File))
    }

    fn file_iter(&self) -> FileIter {
        FileIter {
            current: Some(self.clone()),
        }
    }

    fn inline_iter(&self) -> InlineIter {
        InlineIter {
            current: Some(self.clone()),
        }
    }
}

/// Language codes for `Lang::Iso`.
///
/// The 3-character codes are ISO 639-3.
#[derive(Debug, Clone, Eq, PartialEq, Hash, EnumString, PartialOrd, Ord)]
pub enum IsoLang {
    #[strum(serialize = "en", serialize = "eng")]
    English,
    #[strum(serialize = "de", serialize = "deu")]
    Deutsch,
    #[strum(serialize = "pt", serialize = "por")]
    Portuguese,
    #[strum(serialize = "zh", serialize = "zho")]
    Chinese,
    #[strum(serialize = "fr", serialize = "fra")]
    French,
    #[strum(serialize = "es", serialize = "esp")]
    Spanish,
    #[strum(serialize = "ja", serialize = "jpn")]
    Japanese,
    #[strum(serialize = "ar", serialize = "ara")]
    Arabic,
    /// The rest do not participate in the dialect fallback relation, so just
    /// treat them as strings.
    #[strum(default)]
    Other(SmartString),
}

impl IsoLang {
    fn short_code(&self) -> &str {
        match self {
            IsoLang::English => "en",
            IsoLang::Deutsch => "de",
            IsoLang::Portuguese => "pt",
            IsoLang::Spanish => "es",
            IsoLang::French => "fr",
            IsoLang::Chinese => "zh",
            IsoLang::Japanese => "ja",
            IsoLang::Arabic => "ar",
            IsoLang::Other(ref o) => o,
        }
    }
}

impl fmt::Display for IsoLang {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

/// Countries for `Lang::Iso` dialects.
///
/// These are used for dialect fallback; countries not in the list can be
/// represented as `IsoCountry::Other`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, EnumString, PartialOrd, Ord)]
pub enum IsoCountry {
    /// United States
    US,
    /// Great Britain
    GB,
    /// Australia
    AU,
    /// Deutschland
    DE,
    /// Austria
    AT,
    /// Switzerland
    CH,
    /// China
    CN,
    /// Taiwan
    TW,
    /// Portugal
    PT,
    /// Brazil
    BR,
    /// Japan
    JP,
    /// Spain
    ES,
    /// France
    FR,
    /// Canada
    CA,
    #[strum(default)]
    Other(SmartString),
}

impl fmt::Display for IsoCountry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IsoCountry::Other(ref o) => write!(f, "{}", o),
            _ => write!(f, "{:?}", self),
        }
    }
}

struct FileIter {
    current: Option<Lang>,
}

struct InlineIter {
    current: Option<Lang>,
}

impl Iterator for FileIter {
    type Item = Lang;
    fn next(&mut self) -> Option<Lang> {
        use self::IsoCountry::*;
        use self::IsoLang::*;
        use self::Lang::*;
        let next = self.current.as_ref().and_then(|curr| match curr {
            // Technically speaking most countries' English dialects are
            // closer to en-GB than en-US, but predictably implementing the
            // fallback relation matters more.
            Iso(English, Some(co)) if *co != US => Some(Iso(English, Some(US))),
            Iso(English, Some(US)) => None,
            Iso(Deutsch, Some(co)) if *co != DE => Some(Iso(Deutsch, Some(DE))),
            Iso(French, Some(co)) if *co != FR => Some(Iso(French, Some(FR))),
            Iso(Portuguese, Some(co)) if *co != PT => Some(Iso(Portuguese, Some(PT))),
            Iso(Chinese, Some(TW)) => Some(Iso(Chinese, Some(CN))),
            _ => Some(Iso(English, Some(US))),
        });
        mem::replace(&mut self.current, next)
    }
}

impl Iterator for InlineIter {
    type Item = Lang;
    fn next(&mut self) -> Option<Lang> {
        use self::Lang::*;
        let next = self.current.as_ref().and_then(|curr| match curr {
            Iso(lang, Some(_)) => Some(Iso(lang.clone(), None)),
            _ => None,
        });
        mem::replace(&mut self.current, next)
    }
}

impl FromStr for Lang {
    type Err = String;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Ok((remainder, parsed)) = parse_lang(input) {
            if remainder.is_empty() {
                Ok(parsed)
            } else {
                Err(format!("trailing garbage in language tag: {}", remainder))
            }
        } else {
            Err(format!("could not parse language tag: {}", input))
        }
    }
}

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while_m_n},
    combinator::{map, opt},
    sequence::{preceded, tuple},
    IResult,
};

fn iso_lang(inp: &str) -> IResult<&str, IsoLang> {
    map(take_while_m_n(2, 3, char::is_alphabetic), |lang| {
        // Unwrap is fine: the derive has a default case with no Err output
        IsoLang::from_str(lang).unwrap()
    })(inp)
}

fn iso_country(inp: &str) -> IResult<&str, IsoCountry> {
    map(
        preceded(tag("-"), take_while_m_n(2, 2, char::is_alphabetic)),
        |country| IsoCountry::from_str(country).unwrap(),
    )(inp)
}

fn parse_iana(inp: &str) -> IResult<&str, Lang> {
    map(preceded(tag("i-"), take_while(|_| true)), |lang| {
        Lang::Iana(SmartString::from(lang))
    })(inp)
}

fn parse_unofficial(inp: &str) -> IResult<&str, Lang> {
    map(
        preceded(tag("x-"), take_while_m_n(1, 8, char::is_alphanumeric)),
        |lang| Lang::Unofficial(SmartString::from(lang)),
    )(inp)
}

fn parse_iso(inp: &str) -> IResult<&str, Lang> {
    map(tuple((iso_lang, opt(iso_country))), |(lang, country)| {
        Lang::Iso(lang, country)
    })(inp)
}

fn parse_lang(inp: &str) -> IResult<&str, Lang> {
    alt((parse_unofficial, parse_iana, parse_iso))(inp)
}

#[cfg(test)]
mod test {
    use super::*;

    fn en_us() -> Lang {
        Lang::en_us()
    }

    #[test]
    fn lang_from_str() {
        let de_at = Lang::Iso(IsoLang::Deutsch, Some(IsoCountry::AT));
        let de = Lang::Iso(IsoLang::Deutsch, None);
        assert_eq!(Lang::from_str("de-AT"), Ok(de_at));
        assert_eq!(Lang::from_str("de"), Ok(de));
        assert_eq!(
            Lang::from_str("x-Newspeak"),
            Ok(Lang::Unofficial("Newspeak".into()))
        );
        assert!(Lang::from_str("de-").is_err());
    }

    #[test]
    fn lang_display_roundtrip() {
        for tag in &["en-US", "fr-FR", "de-AT", "pt", "x-klingon"] {
            let lang = Lang::from_str(tag).unwrap();
            assert_eq!(&lang.to_string(), tag);
        }
    }

    #[test]
    fn file_fallback_german_dialect() {
        let de_at = Lang::Iso(IsoLang::Deutsch, Some(IsoCountry::AT));
        let de_de = Lang::Iso(IsoLang::Deutsch, Some(IsoCountry::DE));
        assert_eq!(
            de_at.file_iter().collect::<Vec<_>>(),
            &[de_at, de_de, en_us()]
        );
    }

    #[test]
    fn full_chain_french() {
        let fr_fr = Lang::Iso(IsoLang::French, Some(IsoCountry::FR));
        let fr = Lang::Iso(IsoLang::French, None);
        assert_eq!(
            fr_fr.iter().collect::<Vec<_>>(),
            &[
                LocaleSource::Inline(Some(fr_fr.clone())),
                LocaleSource::Inline(Some(fr)),
                LocaleSource::Inline(None),
                LocaleSource::File(fr_fr),
                LocaleSource::File(en_us()),
            ]
        );
    }
}
