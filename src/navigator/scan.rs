//! Heading discovery in a rendered view
//!
//! The rendered view is reached through `HeadingSource`, so the scanner works
//! the same over a parsed HTML document (`HtmlView`) or a test double.

use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::slug::slugify;
use crate::dom;
use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Outline entries
// ─────────────────────────────────────────────────────────────────────────────

/// One heading of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Fragment id of the heading element
    pub id: String,
    /// Visible text at scan time
    pub text: String,
    /// Heading level, 1 for the top level
    pub level: u32,
}

/// A heading element as reported by the rendered view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingElement {
    /// Opaque handle the view uses to find the element again
    pub key: usize,
    /// The element's `id`, if it has a non-empty one
    pub id: Option<String>,
    pub text: String,
    pub level: u32,
}

/// Result of one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The view has no content yet; try again once it renders
    NotRendered,
    /// The view is rendered; the list may be empty
    Headings(Vec<OutlineEntry>),
}

impl ScanOutcome {
    /// Whether the scan found at least one heading.
    pub fn found_any(&self) -> bool {
        matches!(self, ScanOutcome::Headings(entries) if !entries.is_empty())
    }

    pub fn into_entries(self) -> Vec<OutlineEntry> {
        match self {
            ScanOutcome::NotRendered => Vec::new(),
            ScanOutcome::Headings(entries) => entries,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HeadingSource
// ─────────────────────────────────────────────────────────────────────────────

/// A rendered document the navigator can query for headings.
pub trait HeadingSource {
    /// Whether there is rendered content to search.
    fn is_rendered(&self) -> bool;

    /// Heading elements in document order: tags `h1` through `h{max_level}`
    /// plus any element with `role="heading"`.
    fn heading_elements(&self, max_level: u32) -> Vec<HeadingElement>;

    /// Set the `id` of the element identified by `key`.
    fn assign_id(&mut self, key: usize, id: &str);
}

/// Scan `source` for headings, giving every heading without an id one
/// derived from its text.
///
/// Ids are not de-duplicated: two headings with the same text share an id.
/// Text that slugifies to nothing gets `heading-N` (1-based position).
pub fn scan_headings<S: HeadingSource + ?Sized>(source: &mut S, max_level: u32) -> ScanOutcome {
    if !source.is_rendered() {
        return ScanOutcome::NotRendered;
    }

    let elements = source.heading_elements(max_level);
    let mut entries = Vec::with_capacity(elements.len());

    for (position, element) in elements.into_iter().enumerate() {
        let id = match element.id {
            Some(id) => id,
            None => {
                let mut id = slugify(&element.text);
                if id.is_empty() {
                    id = format!("heading-{}", position + 1);
                }
                source.assign_id(element.key, &id);
                id
            }
        };
        entries.push(OutlineEntry {
            id,
            text: element.text,
            level: element.level,
        });
    }

    debug!("Heading scan found {} entries", entries.len());
    ScanOutcome::Headings(entries)
}

// ─────────────────────────────────────────────────────────────────────────────
// HtmlView
// ─────────────────────────────────────────────────────────────────────────────

/// A rendered view backed by an html5ever DOM.
///
/// Starts either rendered (`from_html`) or empty (`pending`), in which case
/// content arrives later through `render`.
pub struct HtmlView {
    dom: Option<RcDom>,
}

impl HtmlView {
    /// A view whose content has not rendered yet.
    pub fn pending() -> Self {
        Self { dom: None }
    }

    pub fn from_html(html: &str) -> Self {
        Self {
            dom: Some(dom::parse_html(html)),
        }
    }

    /// Replace the view's content.
    pub fn render(&mut self, html: &str) {
        self.dom = Some(dom::parse_html(html));
    }

    /// Serialize the view's body, including any ids assigned by a scan.
    pub fn to_html(&self) -> Result<String> {
        match self.dom.as_ref().and_then(dom::body) {
            Some(body) => dom::inner_html(&body),
            None => Ok(String::new()),
        }
    }

    /// Every element under `<body>`, in document order.
    fn elements(&self) -> Vec<Handle> {
        let mut found = Vec::new();
        if let Some(body) = self.dom.as_ref().and_then(dom::body) {
            collect_elements(&body, &mut found);
        }
        found
    }
}

fn collect_elements(node: &Handle, found: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        if let NodeData::Element { .. } = child.data {
            found.push(child.clone());
        }
        collect_elements(child, found);
    }
}

/// Heading level of `element`, if it is one: the tag number for `h1`..`hN`,
/// otherwise `aria-level` (default 1) for `role="heading"`.
fn heading_level(element: &Handle, max_level: u32) -> Option<u32> {
    let name = dom::element_name(element)?;
    if let Some(level) = name
        .strip_prefix('h')
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| (1..=6).contains(n))
    {
        return (level <= max_level).then_some(level);
    }

    let is_heading_role = dom::attr(element, "role")
        .is_some_and(|role| role.trim().eq_ignore_ascii_case("heading"));
    if !is_heading_role {
        return None;
    }
    let level = dom::attr(element, "aria-level")
        .and_then(|l| l.trim().parse::<u32>().ok())
        .filter(|l| *l >= 1)
        .unwrap_or(1);
    Some(level)
}

impl HeadingSource for HtmlView {
    fn is_rendered(&self) -> bool {
        self.dom.is_some()
    }

    fn heading_elements(&self, max_level: u32) -> Vec<HeadingElement> {
        self.elements()
            .iter()
            .enumerate()
            .filter_map(|(key, element)| {
                let level = heading_level(element, max_level)?;
                let id = dom::attr(element, "id").filter(|id| !id.trim().is_empty());
                let text = dom::text_content(element).trim().to_string();
                Some(HeadingElement {
                    key,
                    id,
                    text,
                    level,
                })
            })
            .collect()
    }

    fn assign_id(&mut self, key: usize, id: &str) {
        if let Some(element) = self.elements().get(key) {
            dom::set_attr(element, "id", id);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, text: &str, level: u32) -> OutlineEntry {
        OutlineEntry {
            id: id.into(),
            text: text.into(),
            level,
        }
    }

    #[test]
    fn test_scan_assigns_missing_ids() {
        let mut view = HtmlView::from_html(
            "<h1>Intro</h1><p>x</p><h2 id=\"custom\">Setup Guide</h2><h3>Next Steps</h3>",
        );
        let outcome = scan_headings(&mut view, 3);
        assert_eq!(
            outcome,
            ScanOutcome::Headings(vec![
                entry("intro", "Intro", 1),
                entry("custom", "Setup Guide", 2),
                entry("next-steps", "Next Steps", 3),
            ])
        );

        let html = view.to_html().unwrap();
        assert!(html.contains("<h1 id=\"intro\">Intro</h1>"));
        assert!(html.contains("<h3 id=\"next-steps\">"));
    }

    #[test]
    fn test_scan_respects_max_level() {
        let mut view = HtmlView::from_html("<h1>A</h1><h4>Deep</h4><h2>B</h2>");
        let entries = scan_headings(&mut view, 2).into_entries();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_aria_headings() {
        let mut view = HtmlView::from_html(
            "<div role=\"heading\" aria-level=\"2\">Aria Two</div><span role=\"heading\">Aria Default</span>",
        );
        let entries = scan_headings(&mut view, 3).into_entries();
        assert_eq!(
            entries,
            vec![
                entry("aria-two", "Aria Two", 2),
                entry("aria-default", "Aria Default", 1),
            ]
        );
    }

    #[test]
    fn test_duplicate_headings_share_an_id() {
        let mut view = HtmlView::from_html("<h2>Notes</h2><h2>Notes</h2>");
        let entries = scan_headings(&mut view, 3).into_entries();
        assert_eq!(entries[0].id, "notes");
        assert_eq!(entries[1].id, "notes");
    }

    #[test]
    fn test_empty_slug_falls_back_to_position() {
        let mut view = HtmlView::from_html("<h1>Title</h1><h2>???</h2>");
        let entries = scan_headings(&mut view, 3).into_entries();
        assert_eq!(entries[1].id, "heading-2");
    }

    #[test]
    fn test_not_rendered_is_distinct_from_empty() {
        let mut pending = HtmlView::pending();
        assert_eq!(scan_headings(&mut pending, 3), ScanOutcome::NotRendered);

        let mut empty = HtmlView::from_html("<p>No headings here</p>");
        let outcome = scan_headings(&mut empty, 3);
        assert_eq!(outcome, ScanOutcome::Headings(vec![]));
        assert!(!outcome.found_any());
    }

    #[test]
    fn test_render_after_pending() {
        let mut view = HtmlView::pending();
        view.render("<h1>Late</h1>");
        assert!(scan_headings(&mut view, 3).found_any());
    }

    #[test]
    fn test_heading_text_is_trimmed_and_nested() {
        let mut view = HtmlView::from_html("<h2>  <em>Styled</em> heading </h2>");
        let entries = scan_headings(&mut view, 3).into_entries();
        assert_eq!(entries, vec![entry("styled-heading", "Styled heading", 2)]);
    }
}
