//! Defines the [`Parser`], [`Parsed`], [`Skip`], and [`Error`] types. Also
//! defines the logic for discovering content files on the file system and
//! parsing their front matter into [`Entry`] objects.

use std::{
    collections::BTreeSet,
    fmt, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::warn;
use walkdir::WalkDir;

use crate::{config::Config, date, entry::Entry};

/// Discovers and parses content files below a content directory.
pub struct Parser<'a> {
    /// The root of the content tree. Entry URLs are relative to it.
    content_directory: &'a Path,

    /// Only files whose names end with `suffix` are candidates.
    suffix: &'a str,

    /// Directories with this name are pruned from the traversal.
    tags_directory: &'a str,

    /// Candidate files that are never parsed, relative to
    /// `content_directory`.
    skip: Vec<&'a Path>,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser from the relevant [`Config`] fields. The main
    /// index is always skipped, whether or not it's listed in
    /// [`Config::skip`].
    pub fn new(config: &'a Config) -> Parser<'a> {
        let mut skip: Vec<&Path> =
            config.skip.iter().map(PathBuf::as_path).collect();
        skip.push(&config.main_index);
        Parser {
            content_directory: &config.content_directory,
            suffix: &config.suffix,
            tags_directory: &config.tags_directory,
            skip,
        }
    }

    /// Recursively lists candidate files. Siblings are visited in file-name
    /// order. Unreadable directories are logged and skipped.
    pub fn discover(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(self.content_directory)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
            .into_iter()
            .filter_entry(move |entry| {
                !(entry.depth() > 0
                    && entry.file_type().is_dir()
                    && entry.file_name() == self.tags_directory)
            })
            .filter_map(|result| match result {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable path");
                    None
                }
            })
            .filter(move |entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_string_lossy().ends_with(self.suffix)
            })
            .map(walkdir::DirEntry::into_path)
            .filter(move |path| !self.is_skipped(path))
    }

    fn is_skipped(&self, path: &Path) -> bool {
        match path.strip_prefix(self.content_directory) {
            Ok(relative) => self.skip.iter().any(|skip| *skip == relative),
            Err(_) => false,
        }
    }

    /// Parses the content file at `path`. Files that can't be read or whose
    /// front matter isn't valid YAML produce an [`Error`] annotated with the
    /// path; files that are merely unsuitable for indexing produce
    /// [`Parsed::Skipped`].
    ///
    /// A content file is structured as follows:
    ///
    /// 1. Initial front-matter fence (`---`)
    /// 2. YAML front matter with fields `title`, `date`, and optionally
    ///    `tags`
    /// 3. Terminal front-matter fence (`---`)
    /// 4. Body, which is ignored
    ///
    /// ```md
    /// ---
    /// title: Hello, world!
    /// date: 2021-04-16
    /// tags: [greet]
    /// ---
    /// # Hello
    /// ```
    pub fn parse(&self, path: &Path) -> Result<Parsed> {
        match self.parse_file(path) {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(Error::Annotated(
                format!("parsing `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn parse_file(&self, path: &Path) -> Result<Parsed> {
        let contents = fs::read_to_string(path)?;
        let yaml = match frontmatter(&contents) {
            Ok(yaml) => yaml,
            Err(reason) => return Ok(Parsed::skipped(reason)),
        };
        if yaml.trim().is_empty() {
            return Ok(Parsed::skipped(Skip::EmptyFrontmatter));
        }

        let value: Value = serde_yaml::from_str(yaml)?;
        let frontmatter: Frontmatter = match value {
            Value::Null => return Ok(Parsed::skipped(Skip::EmptyFrontmatter)),
            value @ Value::Mapping(_) => serde_yaml::from_value(value)?,
            _ => return Err(Error::FrontmatterNotMapping),
        };

        // Tags count towards the site's tag set even when the entry itself
        // is excluded below.
        let tags: BTreeSet<String> = match &frontmatter.tags {
            Some(Value::Sequence(items)) => {
                items.iter().filter_map(scalar).collect()
            }
            _ => BTreeSet::new(),
        };

        let title = match frontmatter.title.as_ref().and_then(scalar) {
            Some(title) => title,
            None => {
                return Ok(Parsed::Skipped {
                    reason: Skip::MissingTitle,
                    tags,
                })
            }
        };
        let raw_date = match frontmatter.date.as_ref().and_then(scalar) {
            Some(date) => date,
            None => {
                return Ok(Parsed::Skipped {
                    reason: Skip::MissingDate,
                    tags,
                })
            }
        };
        let date = match date::parse(&raw_date) {
            Ok(date) => date,
            Err(err) => {
                return Ok(Parsed::Skipped {
                    reason: Skip::InvalidDate(err),
                    tags,
                })
            }
        };

        Ok(Parsed::Entry(Entry {
            title,
            url: self.url(path),
            date,
            tags,
        }))
    }

    /// Derives the site URL for a content file: the path relative to the
    /// content directory, with `/` separators, less the suffix, prefixed with
    /// `/` (e.g., `{content}/posts/hello/index.md` is `/posts/hello/`).
    fn url(&self, path: &Path) -> String {
        let relative = path.strip_prefix(self.content_directory).unwrap_or(path);
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let trimmed = joined.strip_suffix(self.suffix).unwrap_or(&joined);
        format!("/{}", trimmed.trim_start_matches('/'))
    }
}

/// Returns the YAML between the opening and closing fences. Fences are lines
/// consisting of `---` and optional surrounding whitespace.
fn frontmatter(input: &str) -> std::result::Result<&str, Skip> {
    const FENCE: &str = "---";
    let input = input.trim_start_matches('\u{feff}');
    let mut lines = input.split_inclusive('\n');
    let start = match lines.next() {
        Some(first) if first.trim() == FENCE => first.len(),
        _ => return Err(Skip::MissingStartFence),
    };

    let mut offset = start;
    for line in lines {
        if line.trim() == FENCE {
            return Ok(&input[start..offset]);
        }
        offset += line.len();
    }
    Err(Skip::MissingEndFence)
}

/// Stringifies YAML scalars; sequences, mappings, and nulls yield `None`.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[derive(Deserialize)]
struct Frontmatter {
    /// The title of the entry.
    #[serde(default)]
    title: Option<Value>,

    /// The date of the entry, in any form understood by [`date::parse`].
    #[serde(default)]
    date: Option<Value>,

    /// The tags associated with the entry. Only sequences count.
    #[serde(default)]
    tags: Option<Value>,
}

/// The outcome of parsing a single content file.
#[derive(Debug, PartialEq)]
pub enum Parsed {
    /// The file yielded an indexable entry.
    Entry(Entry),

    /// The file was excluded. `tags` holds whatever tags its front matter
    /// declared, which still belong to the site's tag set.
    Skipped { reason: Skip, tags: BTreeSet<String> },
}

impl Parsed {
    fn skipped(reason: Skip) -> Parsed {
        Parsed::Skipped {
            reason,
            tags: BTreeSet::new(),
        }
    }
}

/// Why a file was excluded from indexing.
#[derive(Debug, Clone, PartialEq)]
pub enum Skip {
    /// The file doesn't begin with a `---` line.
    MissingStartFence,

    /// The opening `---` line was never closed.
    MissingEndFence,

    /// The front matter is empty or `null`.
    EmptyFrontmatter,

    /// The front matter has no scalar `title`.
    MissingTitle,

    /// The front matter has no scalar `date`.
    MissingDate,

    /// The `date` couldn't be parsed.
    InvalidDate(date::ParseError),
}

impl fmt::Display for Skip {
    /// Displays a [`Skip`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Skip::MissingStartFence => write!(f, "no front matter"),
            Skip::MissingEndFence => write!(f, "missing closing `---`"),
            Skip::EmptyFrontmatter => write!(f, "empty front matter"),
            Skip::MissingTitle => write!(f, "missing `title`"),
            Skip::MissingDate => write!(f, "missing `date`"),
            Skip::InvalidDate(err) => err.fmt(f),
        }
    }
}

/// Represents the result of a [`Parser::parse`] operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error reading or decoding a content file.
#[derive(Debug)]
pub enum Error {
    /// Returned when there was an error parsing the front matter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the front matter is valid YAML but not a mapping.
    FrontmatterNotMapping,

    /// Returned for I/O errors, including files that aren't valid UTF-8.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::FrontmatterNotMapping => {
                write!(f, "front matter must be a YAML mapping")
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::DeserializeYaml(err) => Some(err),
            Error::FrontmatterNotMapping => None,
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn config(dir: &Path) -> Config {
        Config {
            content_directory: dir.to_owned(),
            ..Config::default()
        }
    }

    fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_entry() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let path = write(
            dir.path(),
            "posts/hello/index.md",
            "---\ntitle: Hello [world]\ndate: 2024-05-10\ntags: [rust, go]\n---\n# Body\n",
        );

        let wanted = Parsed::Entry(Entry {
            title: String::from("Hello [world]"),
            url: String::from("/posts/hello/"),
            date: NaiveDate::from_ymd_opt(2024, 5, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            tags: vec![String::from("go"), String::from("rust")]
                .into_iter()
                .collect(),
        });
        assert_eq!(wanted, Parser::new(&config).parse(&path)?);
        Ok(())
    }

    #[test]
    fn test_parse_missing_date_keeps_tags() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let path = write(
            dir.path(),
            "draft/index.md",
            "---\ntitle: Draft\ntags:\n  - go\n  - 2024\n---\n",
        );

        match Parser::new(&config).parse(&path)? {
            Parsed::Skipped { reason, tags } => {
                assert_eq!(Skip::MissingDate, reason);
                let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
                assert_eq!(vec!["2024", "go"], tags);
            }
            other => panic!("expected a skip, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_skips() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let parser = Parser::new(&config);
        let cases = vec![
            ("a/index.md", "# no front matter\n", Skip::MissingStartFence),
            ("b/index.md", "---\ntitle: x\n", Skip::MissingEndFence),
            ("c/index.md", "---\n---\nbody\n", Skip::EmptyFrontmatter),
            ("d/index.md", "---\n~\n---\n", Skip::EmptyFrontmatter),
            ("e/index.md", "---\ndate: 2024-01-01\n---\n", Skip::MissingTitle),
            (
                "f/index.md",
                "---\ntitle: x\ndate: someday\n---\n",
                Skip::InvalidDate(date::ParseError(String::from("someday"))),
            ),
        ];
        for (relative, contents, wanted) in cases {
            let path = write(dir.path(), relative, contents);
            assert_eq!(
                Parsed::Skipped {
                    reason: wanted,
                    tags: BTreeSet::new()
                },
                parser.parse(&path)?,
                "{}",
                relative
            );
        }
        Ok(())
    }

    #[test]
    fn test_parse_non_string_tags_field_is_ignored() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let path = write(
            dir.path(),
            "a/index.md",
            "---\ntitle: 42\ndate: \"2024-02-03 10:00\"\ntags: rust\n---\n",
        );
        match Parser::new(&config).parse(&path)? {
            Parsed::Entry(entry) => {
                assert_eq!("42", entry.title);
                assert!(entry.tags.is_empty());
            }
            other => panic!("expected an entry, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let parser = Parser::new(&config);

        let bad_yaml =
            write(dir.path(), "a/index.md", "---\ntitle: [unclosed\n---\n");
        match parser.parse(&bad_yaml) {
            Err(Error::Annotated(_, err)) => match *err {
                Error::DeserializeYaml(_) => {}
                other => panic!("expected a YAML error, got {:?}", other),
            },
            other => panic!("expected an error, got {:?}", other),
        }

        let not_mapping = write(dir.path(), "b/index.md", "---\n- a\n- b\n---\n");
        assert!(parser.parse(&not_mapping).is_err());

        let binary = dir.path().join("c").join("index.md");
        fs::create_dir_all(binary.parent().unwrap()).unwrap();
        fs::write(&binary, [0xffu8, 0xfe, 0x00]).unwrap();
        assert!(parser.parse(&binary).is_err());
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        write(dir.path(), "_index.md", "generated");
        write(dir.path(), "index.md", "home");
        write(dir.path(), "tags/go/index.md", "generated");
        write(dir.path(), "posts/tags/index.md", "pruned at any depth");
        write(dir.path(), "posts/b/index.md", "");
        write(dir.path(), "posts/a/index.md", "");
        write(dir.path(), "posts/a/notes.md", "wrong suffix");
        write(dir.path(), "about/index.md", "");

        let found: Vec<PathBuf> = Parser::new(&config)
            .discover()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_owned())
            .collect();
        assert_eq!(
            vec![
                PathBuf::from("about/index.md"),
                PathBuf::from("posts/a/index.md"),
                PathBuf::from("posts/b/index.md"),
            ],
            found
        );
    }

    #[test]
    fn test_frontmatter_fences_tolerate_whitespace() {
        assert_eq!(
            Ok("title: x\n"),
            frontmatter("---  \ntitle: x\n  ---\nbody")
        );
        assert_eq!(Ok(""), frontmatter("---\r\n---\r\n"));
        assert_eq!(Err(Skip::MissingStartFence), frontmatter(""));
    }
}
