//! Defines the [`Entry`] type, the metadata of a single content file as it is
//! used for indexing.

use crate::tag::Tag;
use chrono::{Datelike, NaiveDateTime};
use std::collections::BTreeSet;

/// A parsed content file. Entries are created by
/// [`crate::parser::Parser::parse`] and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The entry's title, verbatim from the front matter.
    pub title: String,

    /// The site-relative URL of the entry, e.g. `/posts/hello/` for
    /// `{content}/posts/hello/index.md`.
    pub url: String,

    /// The entry's date.
    pub date: NaiveDateTime,

    /// The tags declared by the entry. May be empty.
    pub tags: BTreeSet<String>,
}

impl Entry {
    /// The `(year, month)` key under which the entry is grouped.
    pub fn month_key(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }

    /// Returns whether the entry carries `tag`, under any spelling that
    /// shares its slug.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|name| tag.matches(name))
    }
}
