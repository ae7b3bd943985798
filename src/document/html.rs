//! HTML rendering of document trees
//!
//! This is the same node/mark to HTML mapping the editor uses for display,
//! so anything derived from this output (Markdown export, heading outline)
//! matches what the author saw.

use super::node::{Mark, Node};

/// Rel attribute the editor puts on every rendered link.
const LINK_REL: &str = "noopener noreferrer nofollow";

/// Render a document tree to an HTML fragment.
///
/// Unknown nodes render their children (or their text) without a wrapper
/// element. Heading levels outside 1..=6 are clamped for HTML only; the tree
/// itself is not modified.
pub fn render_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_children(nodes: &[Node], out: &mut String) {
    for node in nodes {
        write_node(node, out);
    }
}

fn write_wrapped(tag: &str, nodes: &[Node], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    write_children(nodes, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Doc { content } => write_children(content, out),
        Node::Paragraph { content } => write_wrapped("p", content, out),
        Node::Heading { level, content } => {
            let tag = format!("h{}", (*level).clamp(1, 6));
            write_wrapped(&tag, content, out);
        }
        Node::BulletList { content } => write_wrapped("ul", content, out),
        Node::OrderedList { start, content } => match start {
            Some(start) if *start != 1 => {
                out.push_str(&format!("<ol start=\"{}\">", start));
                write_children(content, out);
                out.push_str("</ol>");
            }
            _ => write_wrapped("ol", content, out),
        },
        Node::ListItem { content } => write_wrapped("li", content, out),
        Node::Blockquote { content } => write_wrapped("blockquote", content, out),
        Node::CodeBlock { language, content } => {
            out.push_str("<pre><code");
            if let Some(lang) = language {
                out.push_str(&format!(" class=\"language-{}\"", escape_attr(lang)));
            }
            out.push('>');
            let code: String = content.iter().map(Node::text_content).collect();
            out.push_str(&escape_text(&code));
            out.push_str("</code></pre>");
        }
        Node::HorizontalRule => out.push_str("<hr>"),
        Node::HardBreak => out.push_str("<br>"),
        Node::Image { src, alt, title } => {
            out.push_str(&format!("<img src=\"{}\"", escape_attr(src)));
            if let Some(alt) = alt {
                out.push_str(&format!(" alt=\"{}\"", escape_attr(alt)));
            }
            if let Some(title) = title {
                out.push_str(&format!(" title=\"{}\"", escape_attr(title)));
            }
            out.push('>');
        }
        Node::Text { text, marks } => write_marked_text(text, marks, out),
        Node::Unknown { content, text, .. } => match text {
            Some(text) => out.push_str(&escape_text(text)),
            None => write_children(content, out),
        },
    }
}

/// Write a text run, opening marks in order and closing them in reverse.
fn write_marked_text(text: &str, marks: &[Mark], out: &mut String) {
    let mut closers = Vec::with_capacity(marks.len());
    for mark in marks {
        let (open, close) = match mark {
            Mark::Bold => ("<strong>".to_string(), "</strong>"),
            Mark::Italic => ("<em>".to_string(), "</em>"),
            Mark::Code => ("<code>".to_string(), "</code>"),
            Mark::Strike => ("<s>".to_string(), "</s>"),
            Mark::Underline => ("<u>".to_string(), "</u>"),
            Mark::Link { href, target } => {
                let mut open = format!("<a href=\"{}\"", escape_attr(href));
                if let Some(target) = target {
                    open.push_str(&format!(" target=\"{}\"", escape_attr(target)));
                }
                open.push_str(&format!(" rel=\"{}\">", LINK_REL));
                (open, "</a>")
            }
            Mark::Unknown { .. } => continue,
        };
        out.push_str(&open);
        closers.push(close);
    }
    out.push_str(&escape_text(text));
    for close in closers.iter().rev() {
        out.push_str(close);
    }
}

/// Escape text content for HTML.
fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for HTML.
fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
