//! Heading navigator
//!
//! Builds an outline of the headings in a rendered document, tracks which
//! heading is active as the page scrolls, and navigates to headings on click
//! or keyboard input.
//!
//! # Example
//! ```
//! use folio::config::NavigatorSettings;
//! use folio::navigator::{HeadingNavigator, HtmlView};
//! use std::time::Duration;
//!
//! let mut view = HtmlView::from_html("<h1>Intro</h1><h2>Usage</h2>");
//! let mut navigator = HeadingNavigator::new(NavigatorSettings::default());
//! navigator.refresh(Duration::ZERO, &mut view);
//!
//! let ids: Vec<_> = navigator.outline().iter().map(|e| e.id.as_str()).collect();
//! assert_eq!(ids, ["intro", "usage"]);
//! ```

mod active;
mod controller;
mod keyboard;
mod scan;
mod slug;
mod timers;

pub use active::{compute_active, HeadingBox, Viewport};
pub use controller::{HeadingNavigator, ScrollHost};
pub use keyboard::NavKey;
pub use scan::{scan_headings, HeadingElement, HeadingSource, HtmlView, OutlineEntry, ScanOutcome};
pub use slug::slugify;
pub use timers::TimerQueue;
