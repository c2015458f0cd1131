//! The library code for the `postindex` index generator. It turns a tree of
//! Markdown content files into Markdown index pages, and can be broken down
//! into three steps:
//!
//! 1. Discovering content files and parsing their front matter into entries
//!    ([`crate::parser`])
//! 2. Sorting entries newest-first and grouping them by calendar month,
//!    optionally filtered by tag ([`crate::index`])
//! 3. Rendering each index to Markdown and writing it to disk
//!    ([`crate::render`], [`crate::build`])
//!
//! One main index lists every entry; one tag index per tag lists only the
//! entries carrying that tag. Every index page carries a navigation line
//! linking to the others.
//!
//! A run never aborts because of a single file: unreadable sources,
//! malformed front matter, unparseable dates, and failed writes are logged and
//! the rest of the work carries on.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod date;
pub mod entry;
pub mod index;
pub mod language;
pub mod parser;
pub mod render;
pub mod tag;
