//! HTML → Markdown reduction
//!
//! Walks an html5ever DOM and reduces it to the Markdown dialect the importer
//! reads back: ATX headings, fenced code, `-`/`N.` lists, `> ` quotes,
//! `**strong**`, `*em*`, code spans, links and images. Elements with no
//! Markdown counterpart collapse to their text.

use log::debug;
use markup5ever_rcdom::{Handle, NodeData};

use super::escape::{escape_inline, escape_line_start, fence_length, inline_code};
use crate::dom;

/// Output choices for the reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownStyle {
    /// Marker for bullet list items (`-`, `*` or `+`)
    pub bullet_marker: char,
}

impl Default for MarkdownStyle {
    fn default() -> Self {
        Self { bullet_marker: '-' }
    }
}

/// Convert an HTML fragment to Markdown with the default style.
pub fn html_to_markdown(html: &str) -> String {
    html_to_markdown_with(html, &MarkdownStyle::default())
}

/// Convert an HTML fragment to Markdown.
///
/// Blocks are separated by one blank line. The result has no leading or
/// trailing blank lines.
pub fn html_to_markdown_with(html: &str, style: &MarkdownStyle) -> String {
    let parsed = dom::parse_html(html);
    let Some(body) = dom::body(&parsed) else {
        debug!("No <body> in parsed HTML; nothing to convert");
        return String::new();
    };
    Reducer { style }.blocks(&body).join("\n\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Element classes
// ─────────────────────────────────────────────────────────────────────────────

/// Elements whose content is never output.
fn is_skipped(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "head" | "title" | "template" | "noscript"
    )
}

/// Elements that start a new block. Anything else is inline.
fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "blockquote"
            | "pre"
            | "hr"
            | "div"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "main"
            | "nav"
            | "aside"
            | "figure"
            | "figcaption"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
            | "td"
            | "th"
            | "dl"
            | "dt"
            | "dd"
    )
}

fn heading_level(tag: &str) -> Option<usize> {
    let level = tag.strip_prefix('h')?.parse::<usize>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

// ─────────────────────────────────────────────────────────────────────────────
// Whitespace
// ─────────────────────────────────────────────────────────────────────────────

/// Collapse every whitespace run (including newlines) to a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                result.push(' ');
            }
            in_space = true;
        } else {
            result.push(c);
            in_space = false;
        }
    }
    result
}

/// Turn an inline buffer into paragraph text.
///
/// `\n` in the buffer only ever comes from `<br>`, so every line but the last
/// keeps a two-space hard break. Returns `None` when nothing visible is left.
fn finish_paragraph(buffer: &str) -> Option<String> {
    let lines: Vec<String> = buffer
        .split('\n')
        .map(|line| collapse_whitespace(line).trim().to_string())
        .collect();

    let first = lines.iter().position(|l| !l.is_empty())?;
    let last = lines.iter().rposition(|l| !l.is_empty())?;

    let text = lines[first..=last]
        .iter()
        .map(|line| escape_line_start(line))
        .collect::<Vec<_>>()
        .join("  \n");
    Some(text)
}

/// Put `marker` around `content`, keeping flanking whitespace outside it.
fn wrap_delimited(content: &str, marker: &str) -> String {
    let inner = content.trim();
    if inner.is_empty() {
        return content.to_string();
    }
    let lead = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trail = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{lead}{marker}{inner}{marker}{trail}")
}

/// Percent-encode the characters that would end a Markdown link target early.
fn encode_destination(url: &str) -> String {
    url.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}

/// Indent every line after the first by `width` spaces (blank lines stay blank).
fn indent_continuation(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Reducer
// ─────────────────────────────────────────────────────────────────────────────

struct Reducer<'a> {
    style: &'a MarkdownStyle,
}

impl Reducer<'_> {
    /// Block-level Markdown for the children of `parent`.
    fn blocks(&self, parent: &Handle) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut inline = String::new();

        for child in parent.children.borrow().iter() {
            match &child.data {
                NodeData::Text { contents } => {
                    inline.push_str(&escape_inline(&collapse_whitespace(&contents.borrow())));
                }
                NodeData::Element { name, .. } => {
                    let tag = &*name.local;
                    if is_skipped(tag) {
                        continue;
                    }
                    if is_block(tag) {
                        blocks.extend(finish_paragraph(&std::mem::take(&mut inline)));
                        self.block(child, tag, &mut blocks);
                    } else {
                        inline.push_str(&self.inline_element(child, tag));
                    }
                }
                _ => {}
            }
        }

        blocks.extend(finish_paragraph(&inline));
        blocks
    }

    fn block(&self, node: &Handle, tag: &str, blocks: &mut Vec<String>) {
        if let Some(level) = heading_level(tag) {
            let text = collapse_whitespace(&self.inline(node)).trim().to_string();
            let hashes = "#".repeat(level);
            blocks.push(if text.is_empty() {
                hashes
            } else {
                format!("{hashes} {text}")
            });
            return;
        }

        match tag {
            "ul" => blocks.extend(self.list(node, None)),
            "ol" => {
                let start = dom::attr(node, "start")
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .unwrap_or(1);
                blocks.extend(self.list(node, Some(start)));
            }
            "blockquote" => {
                let inner = self.blocks(node).join("\n\n");
                if !inner.is_empty() {
                    blocks.push(
                        inner
                            .lines()
                            .map(|l| if l.is_empty() { ">".to_string() } else { format!("> {l}") })
                            .collect::<Vec<_>>()
                            .join("\n"),
                    );
                }
            }
            "pre" => blocks.push(self.code_block(node)),
            "hr" => blocks.push("---".to_string()),
            // p, div, section, li outside a list, table parts, ...
            _ => blocks.extend(self.blocks(node)),
        }
    }

    /// A list; `start` is `Some` for ordered lists.
    fn list(&self, node: &Handle, start: Option<u64>) -> Option<String> {
        let mut items = Vec::new();
        let mut number = start.unwrap_or(1);

        for child in node.children.borrow().iter() {
            if dom::element_name(child) != Some("li") {
                continue;
            }
            let marker = match start {
                Some(_) => format!("{}. ", number),
                None => format!("{} ", self.style.bullet_marker),
            };
            number = number.saturating_add(1);

            let body = self.list_item_body(child);
            if body.is_empty() {
                items.push(marker.trim_end().to_string());
            } else {
                items.push(format!("{}{}", marker, indent_continuation(&body, marker.len())));
            }
        }

        (!items.is_empty()).then(|| items.join("\n"))
    }

    /// Blocks of one list item. Nested lists stay tight against the text
    /// before them; other blocks are separated by a blank line.
    fn list_item_body(&self, item: &Handle) -> String {
        let mut body = String::new();
        for block in self.blocks(item) {
            if !body.is_empty() {
                body.push_str(if self.starts_list(&block) { "\n" } else { "\n\n" });
            }
            body.push_str(&block);
        }
        body
    }

    /// Whether a reduced block is a list. Paragraph text that looks like a
    /// marker has already been escaped, so this cannot misfire on prose.
    fn starts_list(&self, block: &str) -> bool {
        let bullet = format!("{} ", self.style.bullet_marker);
        if block.starts_with(&bullet) || block == self.style.bullet_marker.to_string() {
            return true;
        }
        let digits = block.chars().take_while(|c| c.is_ascii_digit()).count();
        digits > 0 && block[digits..].starts_with('.')
    }

    fn code_block(&self, pre: &Handle) -> String {
        let language = dom::find_element(pre, "code")
            .and_then(|code| dom::attr(&code, "class"))
            .and_then(|class| {
                class
                    .split_whitespace()
                    .find_map(|c| c.strip_prefix("language-").map(str::to_string))
            })
            .unwrap_or_default();

        let mut code = dom::text_content(pre);
        if code.ends_with('\n') {
            code.pop();
        }
        let fence = "`".repeat(fence_length(&code));
        format!("{fence}{language}\n{code}\n{fence}")
    }

    /// Inline Markdown for the children of `parent`.
    fn inline(&self, parent: &Handle) -> String {
        let mut out = String::new();
        for child in parent.children.borrow().iter() {
            match &child.data {
                NodeData::Text { contents } => {
                    out.push_str(&escape_inline(&collapse_whitespace(&contents.borrow())));
                }
                NodeData::Element { name, .. } => {
                    let tag = &*name.local;
                    if !is_skipped(tag) {
                        out.push_str(&self.inline_element(child, tag));
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn inline_element(&self, node: &Handle, tag: &str) -> String {
        match tag {
            "strong" | "b" => wrap_delimited(&self.inline(node), "**"),
            "em" | "i" => wrap_delimited(&self.inline(node), "*"),
            "code" | "kbd" | "samp" => {
                let code = collapse_whitespace(&dom::text_content(node));
                if code.is_empty() {
                    String::new()
                } else {
                    inline_code(&code)
                }
            }
            "a" => {
                let text = self.inline(node);
                match dom::attr(node, "href") {
                    Some(href) if !text.trim().is_empty() => {
                        format!("[{}]({})", text.trim(), encode_destination(&href))
                    }
                    _ => text,
                }
            }
            "img" => {
                let Some(src) = dom::attr(node, "src") else {
                    return String::new();
                };
                let alt = dom::attr(node, "alt")
                    .unwrap_or_default()
                    .replace('[', "\\[")
                    .replace(']', "\\]");
                format!("![{}]({})", alt, encode_destination(&src))
            }
            "br" => "\n".to_string(),
            _ => self.inline(node),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Blocks
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_headings_and_paragraphs() {
        let md = html_to_markdown("<h1>Title</h1><p>Body text</p><h3>Sub</h3>");
        assert_eq!(md, "# Title\n\nBody text\n\n### Sub");
    }

    #[test]
    fn test_whitespace_collapses_outside_pre() {
        let md = html_to_markdown("<p>  lots   of\n\n space  </p>");
        assert_eq!(md, "lots of space");
    }

    #[test]
    fn test_bullet_and_ordered_lists() {
        let md = html_to_markdown("<ul><li><p>a</p></li><li><p>b</p></li></ul><ol start=\"3\"><li>c</li><li>d</li></ol>");
        assert_eq!(md, "- a\n- b\n\n3. c\n4. d");
    }

    #[test]
    fn test_custom_bullet_marker() {
        let style = MarkdownStyle { bullet_marker: '*' };
        let md = html_to_markdown_with("<ul><li>a</li></ul>", &style);
        assert_eq!(md, "* a");
    }

    #[test]
    fn test_nested_list_is_indented() {
        let md = html_to_markdown("<ul><li><p>a</p><ul><li>b</li></ul></li></ul>");
        assert_eq!(md, "- a\n  - b");
    }

    #[test]
    fn test_blockquote() {
        let md = html_to_markdown("<blockquote><p>one</p><p>two</p></blockquote>");
        assert_eq!(md, "> one\n>\n> two");
    }

    #[test]
    fn test_code_block_with_language() {
        let md = html_to_markdown(
            "<pre><code class=\"language-js\">console.log(1)\n</code></pre>",
        );
        assert_eq!(md, "```js\nconsole.log(1)\n```");
    }

    #[test]
    fn test_code_block_keeps_whitespace_and_markup_chars() {
        let md = html_to_markdown("<pre><code>a  *b*\n  c</code></pre>");
        assert_eq!(md, "```\na  *b*\n  c\n```");
    }

    #[test]
    fn test_code_block_fence_grows_past_backticks() {
        let md = html_to_markdown("<pre><code>```inner```</code></pre>");
        assert_eq!(md, "````\n```inner```\n````");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(html_to_markdown("<p>a</p><hr><p>b</p>"), "a\n\n---\n\nb");
    }

    #[test]
    fn test_unknown_elements_collapse_to_text() {
        let md = html_to_markdown("<div><custom-tag>hello <span>there</span></custom-tag></div>");
        assert_eq!(md, "hello there");
    }

    #[test]
    fn test_script_and_style_are_dropped() {
        let md = html_to_markdown("<p>x</p><script>alert(1)</script><style>p{}</style>");
        assert_eq!(md, "x");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(html_to_markdown(""), "");
        assert_eq!(html_to_markdown("<p></p>"), "");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_emphasis() {
        let md = html_to_markdown("<p>a <strong>b</strong> <em>c</em> <code>d</code></p>");
        assert_eq!(md, "a **b** *c* `d`");
    }

    #[test]
    fn test_emphasis_whitespace_moves_outside() {
        let md = html_to_markdown("<p>x<strong> bold </strong>y</p>");
        assert_eq!(md, "x **bold** y");
    }

    #[test]
    fn test_links_and_images() {
        let md = html_to_markdown(
            "<p><a href=\"https://a.dev/x_(y)\" rel=\"nofollow\">site</a></p><p><img src=\"/me.png\" alt=\"Me\"></p>",
        );
        assert_eq!(md, "[site](https://a.dev/x_%28y%29)\n\n![Me](/me.png)");
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(html_to_markdown("<p>one<br>two</p>"), "one  \ntwo");
    }

    #[test]
    fn test_text_is_escaped() {
        let md = html_to_markdown("<p># not a heading *or* [link]</p>");
        assert_eq!(md, "\\# not a heading \\*or\\* \\[link\\]");
    }

    #[test]
    fn test_inline_code_with_backtick() {
        assert_eq!(html_to_markdown("<p><code>a`b</code></p>"), "``a`b``");
    }

    #[test]
    fn test_broken_html_is_repaired() {
        let md = html_to_markdown("<p>open <b>bold<p>next");
        assert_eq!(md, "open **bold**\n\n**next**");
    }
}
