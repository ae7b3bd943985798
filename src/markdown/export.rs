//! Document tree → Markdown export
//!
//! Export goes through the same HTML the editor displays, so the Markdown
//! reflects what the author saw rather than the raw tree.

use log::debug;

use super::from_html::{html_to_markdown_with, MarkdownStyle};
use crate::document::{render_html, Node};

/// Export a document tree as Markdown with the default style.
pub fn tree_to_markdown(tree: &Node) -> String {
    tree_to_markdown_with(tree, &MarkdownStyle::default())
}

/// Export a document tree as Markdown.
///
/// The result never ends with a `/`.
pub fn tree_to_markdown_with(tree: &Node, style: &MarkdownStyle) -> String {
    let html = render_html(tree);
    let markdown = html_to_markdown_with(&html, style);
    debug!(
        "Exported tree: {} bytes of HTML -> {} bytes of Markdown",
        html.len(),
        markdown.len()
    );
    strip_trailing_slash(&markdown)
}

/// Remove trailing `/` characters (and any whitespace around them) from the
/// end of `markdown`. Clean input is returned unchanged.
pub fn strip_trailing_slash(markdown: &str) -> String {
    let mut end = markdown;
    while let Some(rest) = end.trim_end().strip_suffix('/') {
        end = rest;
    }
    if end.len() == markdown.len() {
        return markdown.to_string();
    }
    end.trim_end().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
