//! Document tree node and mark types
//!
//! The editor stores documents as a JSON tree of `{ type, attrs, content,
//! text, marks }` objects. This module gives that tree a typed shape while
//! staying open-ended: node and mark types we don't know about are kept in
//! `Unknown` variants and written back unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Node- or mark-specific attributes, as found in the editor JSON.
pub type Attrs = Map<String, Value>;

// ─────────────────────────────────────────────────────────────────────────────
// Mark
// ─────────────────────────────────────────────────────────────────────────────

/// An inline style or annotation applied to a run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMark", into = "RawMark")]
pub enum Mark {
    Bold,
    Italic,
    Code,
    Strike,
    Underline,
    Link {
        href: String,
        target: Option<String>,
    },
    /// A mark type this crate does not interpret
    Unknown { kind: String, attrs: Attrs },
}

impl Mark {
    /// Create a link mark without an explicit target.
    pub fn link(href: impl Into<String>) -> Self {
        Mark::Link {
            href: href.into(),
            target: None,
        }
    }

    /// The mark's type tag as it appears in JSON.
    pub fn kind(&self) -> &str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Code => "code",
            Mark::Strike => "strike",
            Mark::Underline => "underline",
            Mark::Link { .. } => "link",
            Mark::Unknown { kind, .. } => kind,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawMark {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Attrs>,
}

impl From<RawMark> for Mark {
    fn from(raw: RawMark) -> Self {
        let attrs = raw.attrs.unwrap_or_default();
        match raw.kind.as_str() {
            "bold" => Mark::Bold,
            "italic" => Mark::Italic,
            "code" => Mark::Code,
            "strike" => Mark::Strike,
            "underline" => Mark::Underline,
            "link" => Mark::Link {
                href: attr_string(&attrs, "href").unwrap_or_default(),
                target: attr_string(&attrs, "target"),
            },
            _ => Mark::Unknown {
                kind: raw.kind,
                attrs,
            },
        }
    }
}

impl From<Mark> for RawMark {
    fn from(mark: Mark) -> Self {
        let kind = mark.kind().to_string();
        let attrs = match mark {
            Mark::Link { href, target } => {
                let mut attrs = Attrs::new();
                attrs.insert("href".into(), Value::String(href));
                if let Some(target) = target {
                    attrs.insert("target".into(), Value::String(target));
                }
                Some(attrs)
            }
            Mark::Unknown { attrs, .. } if !attrs.is_empty() => Some(attrs),
            _ => None,
        };
        RawMark { kind, attrs }
    }
}

/// Drop repeated mark types, keeping the first occurrence of each.
fn dedup_marks(marks: Vec<Mark>) -> Vec<Mark> {
    let mut result: Vec<Mark> = Vec::with_capacity(marks.len());
    for mark in marks {
        if !result.iter().any(|m| m.kind() == mark.kind()) {
            result.push(mark);
        }
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Node
// ─────────────────────────────────────────────────────────────────────────────

/// A node of the structured document tree.
///
/// Container variants carry `content`; `Text` is the only leaf carrying text.
/// The root of a document is always `Doc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum Node {
    Doc {
        content: Vec<Node>,
    },
    Paragraph {
        content: Vec<Node>,
    },
    /// Heading; `level` is kept as written, even outside 1..=6
    Heading {
        level: u32,
        content: Vec<Node>,
    },
    BulletList {
        content: Vec<Node>,
    },
    OrderedList {
        start: Option<u64>,
        content: Vec<Node>,
    },
    ListItem {
        content: Vec<Node>,
    },
    Blockquote {
        content: Vec<Node>,
    },
    CodeBlock {
        language: Option<String>,
        content: Vec<Node>,
    },
    HorizontalRule,
    HardBreak,
    Image {
        src: String,
        alt: Option<String>,
        title: Option<String>,
    },
    Text {
        text: String,
        marks: Vec<Mark>,
    },
    /// A node type this crate does not interpret
    Unknown {
        kind: String,
        attrs: Attrs,
        content: Vec<Node>,
        text: Option<String>,
    },
}

impl Node {
    // ─────────────────────────────────────────────────────────────────────────
    // Constructors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn doc(content: Vec<Node>) -> Self {
        Node::Doc { content }
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Node::Paragraph { content }
    }

    pub fn heading(level: u32, content: Vec<Node>) -> Self {
        Node::Heading { level, content }
    }

    pub fn list_item(content: Vec<Node>) -> Self {
        Node::ListItem { content }
    }

    /// A plain text run.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// A text run with marks; repeated mark types are dropped.
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Node::Text {
            text: text.into(),
            marks: dedup_marks(marks),
        }
    }

    pub fn image(src: impl Into<String>, alt: Option<String>) -> Self {
        Node::Image {
            src: src.into(),
            alt,
            title: None,
        }
    }

    /// A code block holding `code` as a single text child.
    pub fn code_block(language: Option<String>, code: impl Into<String>) -> Self {
        let code = code.into();
        let content = if code.is_empty() {
            Vec::new()
        } else {
            vec![Node::text(code)]
        };
        Node::CodeBlock { language, content }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The node's type tag as it appears in JSON.
    pub fn kind(&self) -> &str {
        match self {
            Node::Doc { .. } => "doc",
            Node::Paragraph { .. } => "paragraph",
            Node::Heading { .. } => "heading",
            Node::BulletList { .. } => "bulletList",
            Node::OrderedList { .. } => "orderedList",
            Node::ListItem { .. } => "listItem",
            Node::Blockquote { .. } => "blockquote",
            Node::CodeBlock { .. } => "codeBlock",
            Node::HorizontalRule => "horizontalRule",
            Node::HardBreak => "hardBreak",
            Node::Image { .. } => "image",
            Node::Text { .. } => "text",
            Node::Unknown { kind, .. } => kind,
        }
    }

    /// Child nodes; empty for leaves.
    pub fn content(&self) -> &[Node] {
        match self {
            Node::Doc { content }
            | Node::Paragraph { content }
            | Node::Heading { content, .. }
            | Node::BulletList { content }
            | Node::OrderedList { content, .. }
            | Node::ListItem { content }
            | Node::Blockquote { content }
            | Node::CodeBlock { content, .. }
            | Node::Unknown { content, .. } => content,
            Node::HorizontalRule | Node::HardBreak | Node::Image { .. } | Node::Text { .. } => &[],
        }
    }

    /// Whether this node sits at block level (as opposed to inline runs).
    pub fn is_block(&self) -> bool {
        match self {
            Node::Text { .. } | Node::HardBreak | Node::Image { .. } => false,
            Node::Unknown { content, .. } => !content.is_empty(),
            _ => true,
        }
    }

    /// Plain text of the node and its descendants.
    ///
    /// Block children are separated by a blank line, hard breaks become a
    /// newline. This is the text used for search indexing.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match self {
            Node::Text { text, .. } => output.push_str(text),
            Node::HardBreak => output.push('\n'),
            Node::Unknown {
                text: Some(text), ..
            } => output.push_str(text),
            _ => {
                let mut first = true;
                for child in self.content() {
                    if child.is_block() && !first {
                        output.push_str("\n\n");
                    }
                    child.collect_text(output);
                    first = false;
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // JSON
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode a document tree from editor JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::document)
    }

    /// Encode the tree as editor JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let encoded = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        encoded.map_err(Error::document)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Raw JSON shape
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<Vec<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    marks: Option<Vec<Mark>>,
}

impl RawNode {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attrs: None,
            content: None,
            text: None,
            marks: None,
        }
    }

    fn with_content(mut self, content: Vec<Node>) -> Self {
        if !content.is_empty() {
            self.content = Some(content);
        }
        self
    }

    fn with_attrs(mut self, attrs: Attrs) -> Self {
        if !attrs.is_empty() {
            self.attrs = Some(attrs);
        }
        self
    }
}

fn attr_string(attrs: &Attrs, key: &str) -> Option<String> {
    attrs.get(key).and_then(Value::as_str).map(str::to_string)
}

fn attr_u64(attrs: &Attrs, key: &str) -> Option<u64> {
    attrs.get(key).and_then(|v| {
        v.as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
    })
}

fn optional_string(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let attrs = raw.attrs.unwrap_or_default();
        let content = raw.content.unwrap_or_default();
        match raw.kind.as_str() {
            "doc" => Node::Doc { content },
            "paragraph" => Node::Paragraph { content },
            "heading" => Node::Heading {
                level: attr_u64(&attrs, "level")
                    .map(|l| u32::try_from(l).unwrap_or(u32::MAX))
                    .unwrap_or(1),
                content,
            },
            "bulletList" => Node::BulletList { content },
            "orderedList" => Node::OrderedList {
                start: attr_u64(&attrs, "start"),
                content,
            },
            "listItem" => Node::ListItem { content },
            "blockquote" => Node::Blockquote { content },
            "codeBlock" => Node::CodeBlock {
                language: attr_string(&attrs, "language").filter(|l| !l.is_empty()),
                content,
            },
            "horizontalRule" => Node::HorizontalRule,
            "hardBreak" => Node::HardBreak,
            "image" => Node::Image {
                src: attr_string(&attrs, "src").unwrap_or_default(),
                alt: attr_string(&attrs, "alt"),
                title: attr_string(&attrs, "title"),
            },
            "text" => Node::Text {
                text: raw.text.unwrap_or_default(),
                marks: dedup_marks(raw.marks.unwrap_or_default()),
            },
            _ => Node::Unknown {
                kind: raw.kind,
                attrs,
                content,
                text: raw.text,
            },
        }
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let kind = node.kind().to_string();
        let raw = RawNode::new(&kind);
        match node {
            Node::Doc { content }
            | Node::Paragraph { content }
            | Node::BulletList { content }
            | Node::ListItem { content }
            | Node::Blockquote { content } => raw.with_content(content),
            Node::Heading { level, content } => {
                let mut attrs = Attrs::new();
                attrs.insert("level".into(), Value::from(level));
                raw.with_attrs(attrs).with_content(content)
            }
            Node::OrderedList { start, content } => {
                let mut attrs = Attrs::new();
                if let Some(start) = start {
                    attrs.insert("start".into(), Value::from(start));
                }
                raw.with_attrs(attrs).with_content(content)
            }
            Node::CodeBlock { language, content } => {
                let mut attrs = Attrs::new();
                attrs.insert("language".into(), optional_string(language));
                raw.with_attrs(attrs).with_content(content)
            }
            Node::HorizontalRule | Node::HardBreak => raw,
            Node::Image { src, alt, title } => {
                let mut attrs = Attrs::new();
                attrs.insert("src".into(), Value::String(src));
                attrs.insert("alt".into(), optional_string(alt));
                attrs.insert("title".into(), optional_string(title));
                raw.with_attrs(attrs)
            }
            Node::Text { text, marks } => RawNode {
                text: Some(text),
                marks: if marks.is_empty() { None } else { Some(marks) },
                ..raw
            },
            Node::Unknown {
                attrs,
                content,
                text,
                ..
            } => RawNode { text, ..raw }.with_attrs(attrs).with_content(content),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
