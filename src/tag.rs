//! Defines the [`Tag`] type, which represents an [`crate::entry::Entry`] tag
//! together with the location of its index page.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Represents a tag as it appears across the site. Tags are identified by
/// their `slug`, so e.g. `macOS` and `MacOS` resolve to the same tag, page,
/// and URL. The `name` is the spelling shown in navigation lines.
#[derive(Clone, Debug)]
pub struct Tag {
    /// The tag's name, verbatim from the front matter. When several
    /// spellings share a slug, the first one seen is kept.
    pub name: String,

    /// The slugified name. Empty when the name has no sluggable characters.
    pub slug: String,
}

impl Tag {
    /// Creates a [`Tag`] from its front-matter name.
    pub fn new(name: &str) -> Tag {
        Tag {
            name: name.to_owned(),
            slug: slug::slugify(name),
        }
    }

    /// Returns whether `name`, as written in some front matter, refers to
    /// this tag.
    pub fn matches(&self, name: &str) -> bool {
        slug::slugify(name) == self.slug
    }

    /// The URL of the tag's index page given the base `tags_url` (e.g.
    /// `/tags/` yields `/tags/{slug}/`).
    pub fn url(&self, tags_url: &str) -> String {
        format!("{}/{}/", tags_url.trim_end_matches('/'), self.slug)
    }

    /// The output file for the tag's index page:
    /// `{tags_directory}/{slug}/index.md`.
    pub fn index_path(&self, tags_directory: &Path) -> PathBuf {
        tags_directory.join(&self.slug).join("index.md")
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating directly to the `slug`
    /// field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by delegating directly
    /// to the `slug` field.
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}
impl Eq for Tag {}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    /// Tags sort by slug, which is the order of the navigation line.
    fn cmp(&self, other: &Self) -> Ordering {
        self.slug.cmp(&other.slug)
    }
}
