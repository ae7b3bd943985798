//! Active heading selection.

use crate::config::NavigatorSettings;

/// Position of a heading element relative to the top of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingBox {
    pub id: String,
    pub top: f32,
    pub height: f32,
}

impl HeadingBox {
    pub fn new(id: impl Into<String>, top: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Vertical center, viewport-relative.
    pub fn center(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

/// Scroll state of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub height: f32,
    pub scroll_offset: f32,
    pub max_scroll_offset: f32,
}

/// Pick the heading that should be highlighted.
///
/// The reference line is the middle of the part of the viewport below the
/// sticky header. The heading whose center is closest to it wins, the
/// earliest one on ties. Within `bottom_threshold` of the end of the page the
/// last heading wins regardless of distance.
pub fn compute_active(
    headings: &[HeadingBox],
    viewport: &Viewport,
    settings: &NavigatorSettings,
) -> Option<String> {
    let last = headings.last()?;

    if viewport.scroll_offset >= viewport.max_scroll_offset - settings.bottom_threshold {
        return Some(last.id.clone());
    }

    let header = settings.sticky_header_offset;
    let reference = header + (viewport.height - header) / 2.0;

    let mut best: Option<(&HeadingBox, f32)> = None;
    for heading in headings {
        let distance = (heading.center() - reference).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((heading, distance)),
        }
    }

    best.map(|(heading, _)| heading.id.clone())
}
