//! Inline run tokenizer for the import dialect
//!
//! One regex alternation, tried left to right: `**bold**`, `*italic*`,
//! `` `code` ``, `[text](url)`. The first alternative that matches wins and
//! scanning resumes after it, so nested emphasis is read literally.

use regex::Regex;
use std::sync::OnceLock;

use crate::document::{Mark, Node};

static INLINE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn inline_pattern() -> &'static Regex {
    INLINE_PATTERN.get_or_init(|| {
        Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|`(.+?)`|\[(.+?)\]\((.+?)\)")
            .expect("inline pattern is a valid regex")
    })
}

/// Split a line of Markdown into text runs.
///
/// Text between matches becomes plain runs; each match becomes one run with
/// a single mark. Empty input yields no runs.
pub fn parse_inline(text: &str) -> Vec<Node> {
    let mut runs = Vec::new();
    let mut last = 0;

    for caps in inline_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            runs.push(Node::text(&text[last..whole.start()]));
        }

        let run = if let Some(bold) = caps.get(1) {
            Node::marked_text(bold.as_str(), vec![Mark::Bold])
        } else if let Some(italic) = caps.get(2) {
            Node::marked_text(italic.as_str(), vec![Mark::Italic])
        } else if let Some(code) = caps.get(3) {
            Node::marked_text(code.as_str(), vec![Mark::Code])
        } else {
            let label = caps.get(4).map_or("", |m| m.as_str());
            let href = caps.get(5).map_or("", |m| m.as_str());
            Node::marked_text(label, vec![Mark::link(href)])
        };
        runs.push(run);
        last = whole.end();
    }

    if last < text.len() {
        runs.push(Node::text(&text[last..]));
    }

    runs
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
