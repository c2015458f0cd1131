//! Exports the [`run`] function which stitches together the high-level steps
//! of indexing a content tree: discovering and parsing content files
//! ([`crate::parser`]), grouping them ([`crate::index`]), rendering index pages
//! ([`crate::render`]), and writing them to disk.
//!
//! Problems with individual files never abort a run. Unreadable or malformed
//! sources and failed writes are logged and counted in the returned
//! [`Summary`], and every other output is still attempted.

use crate::config::Config;
use crate::entry::Entry;
use crate::index::build_index;
use crate::parser::{Parsed, Parser, Skip};
use crate::render::Renderer;
use crate::tag::Tag;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Everything gathered from the content tree in a single pass.
#[derive(Debug, Default)]
pub struct Site {
    /// Every indexable entry, in discovery order.
    pub entries: Vec<Entry>,

    /// Every tag declared by any content file, including files that were
    /// excluded from the entries. Tags without a usable slug are left out,
    /// as they can't have a page.
    pub tags: BTreeSet<Tag>,

    /// The number of files excluded for lacking usable front matter.
    pub skipped: usize,

    /// The number of files that couldn't be read or decoded.
    pub failed: usize,
}

impl Site {
    fn add_tags<'a>(&mut self, tags: impl Iterator<Item = &'a String>) {
        for name in tags {
            let tag = Tag::new(name);
            if tag.slug.is_empty() {
                warn!(tag = %name, "ignoring tag without a usable slug");
                continue;
            }
            self.tags.insert(tag);
        }
    }
}

/// Counts reported by [`run`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub entries: usize,
    pub skipped: usize,
    pub failed: usize,
    pub tags: usize,
    pub written: usize,
    pub write_failures: usize,
}

/// Discovers and parses every content file below
/// [`Config::content_directory`] exactly once.
pub fn collect(config: &Config) -> Site {
    let parser = Parser::new(config);
    let mut site = Site::default();

    for path in parser.discover() {
        match parser.parse(&path) {
            Ok(Parsed::Entry(entry)) => {
                debug!(path = %path.display(), url = %entry.url, "indexed");
                site.add_tags(entry.tags.iter());
                site.entries.push(entry);
            }
            Ok(Parsed::Skipped { reason, tags }) => {
                match &reason {
                    Skip::InvalidDate(err) => {
                        warn!(path = %path.display(), error = %err, "skipping file with invalid date")
                    }
                    _ => debug!(path = %path.display(), %reason, "skipping file"),
                }
                site.add_tags(tags.iter());
                site.skipped += 1;
            }
            Err(err) => {
                error!(error = %err, "skipping unreadable file");
                site.failed += 1;
            }
        }
    }

    site
}

/// Builds every index page for the content tree described by `config`: the
/// main index first, then one page per tag in slug order.
pub fn run(config: &Config) -> Summary {
    let site = collect(config);
    info!(
        entries = site.entries.len(),
        tags = site.tags.len(),
        skipped = site.skipped,
        failed = site.failed,
        "collected content"
    );

    let renderer = Renderer {
        title: &config.title,
        comments: config.comments,
        layout: &config.layout,
        language: config.language,
        home_url: &config.home_url,
        tags_url: &config.tags_url,
    };
    let mut summary = Summary {
        entries: site.entries.len(),
        skipped: site.skipped,
        failed: site.failed,
        tags: site.tags.len(),
        ..Summary::default()
    };
    let mut record = |result: Result<PathBuf>| match result {
        Ok(path) => {
            info!(path = %path.display(), "wrote index");
            summary.written += 1;
        }
        Err(err) => {
            error!(error = %err, "failed to write index");
            summary.write_failures += 1;
        }
    };

    let groups = build_index(&site.entries, None);
    record(write_output(
        &config.main_index_path(),
        &renderer.render(&groups, None, &site.tags),
    ));

    let tags_path = config.tags_path();
    for tag in &site.tags {
        let groups = build_index(&site.entries, Some(tag));
        record(write_output(
            &tag.index_path(&tags_path),
            &renderer.render(&groups, Some(tag), &site.tags),
        ));
    }

    summary
}

/// Writes `contents` to `path`, creating parent directories as needed, and
/// returns the written path.
fn write_output(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|err| Error::CreateDir {
            path: dir.to_owned(),
            err,
        })?;
    }
    std::fs::write(path, contents).map_err(|err| Error::Write {
        path: path.to_owned(),
        err,
    })?;
    Ok(path.to_owned())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for writing an index page.
#[derive(Debug)]
pub enum Error {
    /// Returned when an output directory can't be created.
    CreateDir { path: PathBuf, err: std::io::Error },

    /// Returned when an output file can't be written.
    Write { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::CreateDir { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CreateDir { path: _, err } => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}
