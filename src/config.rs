//! Loads the project configuration. A project is configured by an optional
//! `postindex.yaml` file, searched for from the working directory up through
//! its ancestors. Every field is optional; missing fields take the defaults
//! documented on [`Config`].

use crate::language::{Language, UnknownLanguage};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The name of the project file.
pub const PROJECT_FILE: &str = "postindex.yaml";

/// The on-disk shape of [`PROJECT_FILE`].
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct Project {
    content_directory: Option<PathBuf>,
    title: Option<String>,
    comments: Option<bool>,
    layout: Option<String>,
    language: Option<Language>,
    suffix: Option<String>,
    tags_directory: Option<String>,
    main_index: Option<PathBuf>,
    skip: Option<Vec<PathBuf>>,
    home_url: Option<String>,
    tags_url: Option<String>,
}

/// The resolved configuration for a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The root of the content tree. Defaults to `content`. Relative paths in
    /// a project file are resolved against the project file's directory.
    pub content_directory: PathBuf,

    /// The `title` written into every index page's front matter.
    pub title: String,

    /// The `comments` flag written into every index page's front matter.
    pub comments: bool,

    /// The `layout` written into every index page's front matter.
    pub layout: String,

    /// The language for month names and labels.
    pub language: Language,

    /// Only files whose names end with this suffix are indexed. Defaults to
    /// `index.md`.
    pub suffix: String,

    /// The name of the directory tag pages are written to, relative to the
    /// content directory. Directories with this name are never traversed.
    pub tags_directory: String,

    /// The main index file, relative to the content directory. Defaults to
    /// `_index.md`.
    pub main_index: PathBuf,

    /// Files (relative to the content directory) that are never indexed.
    pub skip: Vec<PathBuf>,

    /// The link target for the "all" entry of the tag navigation line.
    pub home_url: String,

    /// The base URL of tag pages.
    pub tags_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            content_directory: PathBuf::from("content"),
            title: String::from("Blog"),
            comments: false,
            layout: String::from("single"),
            language: Language::default(),
            suffix: String::from("index.md"),
            tags_directory: String::from("tags"),
            main_index: PathBuf::from("_index.md"),
            skip: vec![PathBuf::from("index.md"), PathBuf::from("_index.md")],
            home_url: String::from("/"),
            tags_url: String::from("/tags/"),
        }
    }
}

impl Config {
    /// Looks for [`PROJECT_FILE`] in `dir` and then in each of its ancestors,
    /// loading the first one found. Falls back to [`Config::default`] when
    /// there is no project file anywhere up the tree.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Ok(Config::default()),
            }
        }
    }

    /// Loads a configuration from the project file at `path`.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })?;
        let project: Project =
            serde_yaml::from_reader(file).map_err(|err| Error::Yaml {
                path: path.to_owned(),
                err,
            })?;
        let project_root = path
            .parent()
            .ok_or_else(|| Error::NoParent(path.to_owned()))?;
        Ok(Config::from_project(project, project_root))
    }

    fn from_project(project: Project, project_root: &Path) -> Config {
        let default = Config::default();
        Config {
            content_directory: project_root.join(
                project
                    .content_directory
                    .unwrap_or(default.content_directory),
            ),
            title: project.title.unwrap_or(default.title),
            comments: project.comments.unwrap_or(default.comments),
            layout: project.layout.unwrap_or(default.layout),
            language: project.language.unwrap_or(default.language),
            suffix: project.suffix.unwrap_or(default.suffix),
            tags_directory: project
                .tags_directory
                .unwrap_or(default.tags_directory),
            main_index: project.main_index.unwrap_or(default.main_index),
            skip: project.skip.unwrap_or(default.skip),
            home_url: project.home_url.unwrap_or(default.home_url),
            tags_url: project.tags_url.unwrap_or(default.tags_url),
        }
    }

    /// The absolute (or working-directory-relative) path of the main index.
    pub fn main_index_path(&self) -> PathBuf {
        self.content_directory.join(&self.main_index)
    }

    /// The directory under which tag pages are written.
    pub fn tags_path(&self) -> PathBuf {
        self.content_directory.join(&self.tags_directory)
    }
}

/// The result of loading a [`Config`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the project file.
#[derive(Debug)]
pub enum Error {
    /// Returned when the project file can't be opened.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when the project file isn't valid YAML or has unknown fields.
    Yaml {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when the project file path has no parent directory.
    NoParent(PathBuf),

    /// Returned when a language override isn't a known language code.
    Language(UnknownLanguage),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io { path, err } => {
                write!(f, "Opening project file '{}': {}", path.display(), err)
            }
            Error::Yaml { path, err } => {
                write!(f, "Loading project file '{}': {}", path.display(), err)
            }
            Error::NoParent(path) => write!(
                f,
                "Can't get parent directory for project file '{}'",
                path.display()
            ),
            Error::Language(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { path: _, err } => Some(err),
            Error::Yaml { path: _, err } => Some(err),
            Error::NoParent(_) => None,
            Error::Language(err) => Some(err),
        }
    }
}

impl From<UnknownLanguage> for Error {
    /// Converts an [`UnknownLanguage`] into an [`Error`]. This allows us to
    /// use the `?` operator when parsing language overrides.
    fn from(err: UnknownLanguage) -> Error {
        Error::Language(err)
    }
}
