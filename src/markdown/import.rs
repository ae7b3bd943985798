//! Markdown → document tree import
//!
//! A single pass over lines with two states, normal and inside a fenced code
//! block. Pending paragraph runs and list items are buffered and flushed when
//! a line of a different kind arrives. Nothing here can fail: lines that match
//! no rule are read as paragraph text.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use super::inline::parse_inline;
use crate::document::Node;

const FENCE: &str = "```";

static ORDERED_MARKER: OnceLock<Regex> = OnceLock::new();
static IMAGE_LINE: OnceLock<Regex> = OnceLock::new();

fn ordered_marker() -> &'static Regex {
    ORDERED_MARKER.get_or_init(|| Regex::new(r"^[0-9]+\.\s").expect("ordered marker is a valid regex"))
}

fn image_line() -> &'static Regex {
    IMAGE_LINE.get_or_init(|| {
        Regex::new(r"^!\[([^\]]*)\]\(([^)]+)\)$").expect("image line is a valid regex")
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Block builder
// ─────────────────────────────────────────────────────────────────────────────

/// Where the parser is between lines.
enum LineState {
    Normal,
    InCode { language: Option<String>, code: String },
}

/// Output blocks plus the buffers that have not been flushed yet.
#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Node>,
    paragraph: Vec<Node>,
    paragraph_open: bool,
    bullet_items: Vec<Node>,
    ordered_items: Vec<Node>,
}

impl BlockBuilder {
    fn flush_paragraph(&mut self) {
        if self.paragraph_open {
            let runs = std::mem::take(&mut self.paragraph);
            self.blocks.push(Node::paragraph(runs));
            self.paragraph_open = false;
        }
    }

    fn flush_bullets(&mut self) {
        if !self.bullet_items.is_empty() {
            let content = std::mem::take(&mut self.bullet_items);
            self.blocks.push(Node::BulletList { content });
        }
    }

    fn flush_ordered(&mut self) {
        if !self.ordered_items.is_empty() {
            let content = std::mem::take(&mut self.ordered_items);
            self.blocks.push(Node::OrderedList {
                start: None,
                content,
            });
        }
    }

    fn flush_lists(&mut self) {
        self.flush_bullets();
        self.flush_ordered();
    }

    fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_lists();
    }

    fn push_block(&mut self, block: Node) {
        self.blocks.push(block);
    }

    fn append_to_paragraph(&mut self, runs: Vec<Node>) {
        self.paragraph.extend(runs);
        self.paragraph_open = true;
    }

    fn finish(mut self) -> Vec<Node> {
        self.flush_paragraph();
        self.flush_bullets();
        self.flush_ordered();
        if self.blocks.is_empty() {
            self.blocks.push(Node::paragraph(Vec::new()));
        }
        self.blocks
    }
}

fn list_item(text: &str) -> Node {
    Node::list_item(vec![Node::paragraph(parse_inline(text))])
}

/// `## Title` → (2, "Title"). The level is the raw `#` count.
fn split_heading(line: &str) -> (u32, &str) {
    let hashes = line.len() - line.trim_start_matches('#').len();
    let rest = &line[hashes..];
    let text = rest.strip_prefix(' ').unwrap_or(rest);
    (u32::try_from(hashes).unwrap_or(u32::MAX), text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Public entry point
// ─────────────────────────────────────────────────────────────────────────────

/// Parse Markdown into a `doc` tree.
///
/// Always returns a document with at least one block; empty input yields a
/// single empty paragraph. A fence left open at end of input is kept as a
/// code block.
pub fn markdown_to_tree(markdown: &str) -> Node {
    let mut builder = BlockBuilder::default();
    let mut state = LineState::Normal;

    for line in markdown.lines() {
        state = match state {
            LineState::InCode { language, mut code } => {
                if line == FENCE {
                    builder.push_block(code_block(language, code));
                    LineState::Normal
                } else {
                    code.push_str(line);
                    code.push('\n');
                    LineState::InCode { language, code }
                }
            }
            LineState::Normal => normal_line(&mut builder, line),
        };
    }

    if let LineState::InCode { language, code } = state {
        debug!("Unterminated code fence at end of input; keeping it as a code block");
        builder.push_block(code_block(language, code));
    }

    Node::doc(builder.finish())
}

fn code_block(language: Option<String>, mut code: String) -> Node {
    if code.ends_with('\n') {
        code.pop();
    }
    Node::code_block(language, code)
}

fn normal_line(builder: &mut BlockBuilder, line: &str) -> LineState {
    if let Some(tag) = line.strip_prefix(FENCE) {
        builder.flush_all();
        let tag = tag.trim();
        return LineState::InCode {
            language: (!tag.is_empty()).then(|| tag.to_string()),
            code: String::new(),
        };
    }

    if line.trim().is_empty() {
        builder.flush_paragraph();
    } else if line.starts_with('#') {
        builder.flush_all();
        let (level, text) = split_heading(line);
        builder.push_block(Node::heading(level, parse_inline(text)));
    } else if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        builder.flush_paragraph();
        builder.flush_ordered();
        builder.bullet_items.push(list_item(rest));
    } else if let Some(marker) = ordered_marker().find(line) {
        builder.flush_paragraph();
        builder.flush_bullets();
        builder.ordered_items.push(list_item(&line[marker.end()..]));
    } else if let Some(rest) = line.strip_prefix("> ") {
        builder.flush_all();
        builder.push_block(Node::Blockquote {
            content: vec![Node::paragraph(parse_inline(rest))],
        });
    } else if let Some(caps) = image_line().captures(line) {
        builder.flush_all();
        let alt = caps.get(1).map_or("", |m| m.as_str());
        let src = caps.get(2).map_or("", |m| m.as_str());
        builder.push_block(Node::paragraph(vec![Node::image(src, Some(alt.to_string()))]));
    } else {
        builder.flush_lists();
        builder.append_to_paragraph(parse_inline(line));
    }

    LineState::Normal
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
