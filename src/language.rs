//! Defines the [`Language`] type, which supplies the month names and the
//! fixed labels written into index pages.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

const MONTHS_PT: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho",
    "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December",
];

/// The language index pages are rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Language {
    #[serde(rename = "pt")]
    Portuguese,

    #[serde(rename = "en")]
    English,
}

impl Default for Language {
    fn default() -> Self {
        Language::Portuguese
    }
}

impl Language {
    /// Returns the name of `month`, where January is `1`. Out-of-range
    /// months yield an empty string.
    pub fn month_name(self, month: u32) -> &'static str {
        let months = match self {
            Language::Portuguese => &MONTHS_PT,
            Language::English => &MONTHS_EN,
        };
        match month {
            1..=12 => months[month as usize - 1],
            _ => "",
        }
    }

    /// The label for the unfiltered index in the tag navigation line.
    pub fn all_label(self) -> &'static str {
        match self {
            Language::Portuguese => "Todas",
            Language::English => "All",
        }
    }

    /// The bold prefix of the tag navigation line.
    pub fn tags_label(self) -> &'static str {
        "Tags:"
    }

    /// The line written in place of groups when an index has no entries.
    pub fn no_posts(self) -> &'static str {
        match self {
            Language::Portuguese => "Nenhum post encontrado.",
            Language::English => "No posts found.",
        }
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pt" => Ok(Language::Portuguese),
            "en" => Ok(Language::English),
            _ => Err(UnknownLanguage(s.to_owned())),
        }
    }
}

/// Returned when a language code isn't one of `pt` or `en`.
#[derive(Debug)]
pub struct UnknownLanguage(String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown language `{}` (expected `pt` or `en`)", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}
