//! Document tree ⇄ Markdown conversion
//!
//! Export renders the tree to the editor's HTML and reduces that HTML to
//! Markdown. Import is a line-oriented parser for a small Markdown dialect
//! (ATX headings, fenced code, `-`/`*`/`N.` lists, `> ` quotes, full-line
//! images, and `**`/`*`/`` ` ``/link inline runs).
//!
//! Neither direction fails: malformed input degrades to plain text.
//!
//! # Example
//! ```
//! use folio::markdown::{markdown_to_tree, tree_to_markdown};
//!
//! let tree = markdown_to_tree("# Title\n\nBody text");
//! assert_eq!(tree_to_markdown(&tree), "# Title\n\nBody text");
//! ```

mod escape;
mod export;
mod from_html;
mod import;
mod inline;

pub use export::{strip_trailing_slash, tree_to_markdown, tree_to_markdown_with};
pub use from_html::{html_to_markdown, html_to_markdown_with, MarkdownStyle};
pub use import::markdown_to_tree;
pub use inline::parse_inline;
