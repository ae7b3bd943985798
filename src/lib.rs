//! folio - rich-document to Markdown conversion and heading navigation
//!
//! The crate is split along the editor's seams:
//!
//! - [`document`]: the structured document tree and its HTML rendering
//! - [`markdown`]: tree → Markdown export and Markdown → tree import
//! - [`navigator`]: heading outline, active-heading tracking and navigation
//! - [`files`]: `{slug}_{lang}.md` export/import on disk, with notices
//! - [`config`]: persisted user settings

pub mod config;
pub mod document;
pub(crate) mod dom;
pub mod error;
pub mod files;
pub mod markdown;
pub mod navigator;

pub use document::{Mark, Node};
pub use error::{Error, Result};
pub use markdown::{markdown_to_tree, tree_to_markdown};
