//! Heading navigator state machine
//!
//! Keeps the outline of a rendered document and exactly one active heading
//! in sync with the scroll position. All waiting is expressed as timers on a
//! caller-driven clock and a frame-request flag; the host drives it by
//! calling `advance`, `on_scroll`, `on_animation_frame` and `on_mutation`.
//!
//! # Lifecycle
//!
//! 1. `refresh` scans the view. If nothing turns up, a mutation watch and a
//!    fallback timer race; the first to fire rescans and cancels the other.
//! 2. Scroll events request at most one recomputation per frame, and none
//!    while a navigation is in flight.
//! 3. `navigate_to` smooth-scrolls, then verifies after a fixed wait and
//!    scrolls directly if the page did not move.
//! 4. `teardown` cancels everything; later calls are no-ops.

use log::{debug, warn};
use std::time::Duration;

use super::active::{compute_active, HeadingBox, Viewport};
use super::scan::{scan_headings, HeadingSource, OutlineEntry, ScanOutcome};
use super::timers::TimerQueue;
use crate::config::NavigatorSettings;

// ─────────────────────────────────────────────────────────────────────────────
// ScrollHost
// ─────────────────────────────────────────────────────────────────────────────

/// The scrolling viewport the rendered document lives in.
pub trait ScrollHost {
    /// Current vertical scroll offset.
    fn scroll_offset(&self) -> f32;

    fn viewport_height(&self) -> f32;

    /// Largest reachable scroll offset.
    fn max_scroll_offset(&self) -> f32;

    /// Viewport-relative box of the element with `id`, if it exists.
    fn heading_bounds(&self, id: &str) -> Option<HeadingBox>;

    /// Ask for an animated scroll that centers the element with `id`.
    fn smooth_scroll_to(&mut self, id: &str);

    /// Jump to an absolute scroll offset.
    fn scroll_to(&mut self, offset: f32);

    /// Replace the address fragment with `id` without adding history.
    fn replace_fragment(&mut self, id: &str);
}

// ─────────────────────────────────────────────────────────────────────────────
// HeadingNavigator
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavTimer {
    /// Rescan after the first scan came up empty
    ScanFallback,
    /// Verify that the last smooth scroll moved the page
    NavigationCheck,
}

#[derive(Debug, Clone)]
struct PendingNavigation {
    id: String,
    start_offset: f32,
}

/// Outline and active-heading state for one rendered view.
#[derive(Debug)]
pub struct HeadingNavigator {
    settings: NavigatorSettings,
    outline: Vec<OutlineEntry>,
    active_id: Option<String>,
    /// Outline index holding keyboard focus
    pub(super) focused: Option<usize>,
    timers: TimerQueue<NavTimer>,
    /// A rescan on the next content mutation is pending
    watching: bool,
    frame_requested: bool,
    navigation: Option<PendingNavigation>,
    torn_down: bool,
}

impl HeadingNavigator {
    pub fn new(settings: NavigatorSettings) -> Self {
        Self {
            settings,
            outline: Vec::new(),
            active_id: None,
            focused: None,
            timers: TimerQueue::new(),
            watching: false,
            frame_requested: false,
            navigation: None,
            torn_down: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Whether a programmatic navigation is in flight.
    pub fn is_navigating(&self) -> bool {
        self.navigation.is_some()
    }

    /// Whether a rescan is waiting on a content mutation.
    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// When `advance` next has work to do.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub(super) fn set_active(&mut self, id: &str) {
        self.active_id = Some(id.to_string());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────────────────

    /// Scan the view for headings.
    ///
    /// Supersedes any retry still pending from an earlier refresh. If nothing
    /// is found, starts watching for mutations and schedules the fallback
    /// rescan; whichever fires first is the final attempt.
    ///
    /// Returns `true` when headings were found and the host should request an
    /// animation frame to pick the initial active heading. A later rescan from
    /// `on_mutation` or `advance` can also leave a frame pending; hosts check
    /// `frame_requested()` after those calls.
    pub fn refresh<S: HeadingSource + ?Sized>(&mut self, now: Duration, source: &mut S) -> bool {
        if self.torn_down {
            return false;
        }
        self.stop_retry();

        let outcome = scan_headings(source, self.settings.max_heading_level);
        if outcome.found_any() {
            self.apply_scan(outcome);
            return self.frame_requested;
        }

        debug!("No headings yet; watching for mutations with a fallback rescan");
        self.outline.clear();
        self.watching = true;
        let due = now + Duration::from_millis(self.settings.scan_fallback_ms);
        self.timers.schedule(NavTimer::ScanFallback, due);
        false
    }

    /// The view's content changed. Rescans if a retry is pending.
    ///
    /// Returns whether the notification was consumed. When the rescan finds
    /// headings, `frame_requested()` turns true.
    pub fn on_mutation<S: HeadingSource + ?Sized>(&mut self, source: &mut S) -> bool {
        if self.torn_down || !self.watching {
            return false;
        }
        self.stop_retry();
        self.final_scan(source);
        true
    }

    fn stop_retry(&mut self) {
        self.watching = false;
        self.timers.cancel(&NavTimer::ScanFallback);
    }

    fn final_scan<S: HeadingSource + ?Sized>(&mut self, source: &mut S) {
        let outcome = scan_headings(source, self.settings.max_heading_level);
        if outcome == ScanOutcome::NotRendered {
            debug!("View still not rendered after retry; outline stays empty");
        }
        self.apply_scan(outcome);
    }

    fn apply_scan(&mut self, outcome: ScanOutcome) {
        self.outline = outcome.into_entries();
        self.focused = None;
        if let Some(active) = &self.active_id {
            if !self.outline.iter().any(|e| &e.id == active) {
                self.active_id = None;
            }
        }
        if !self.outline.is_empty() {
            self.frame_requested = true;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scroll tracking
    // ─────────────────────────────────────────────────────────────────────────

    /// A scroll event arrived.
    ///
    /// Returns `true` when the host should request an animation frame; bursts
    /// of events within one frame only request it once. Ignored while a
    /// navigation is in flight.
    pub fn on_scroll(&mut self) -> bool {
        if self.torn_down || self.navigation.is_some() || self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    /// The requested animation frame arrived. Recomputes the active heading.
    ///
    /// Returns whether the active heading changed.
    pub fn on_animation_frame<H: ScrollHost + ?Sized>(&mut self, host: &H) -> bool {
        if self.torn_down || !self.frame_requested {
            return false;
        }
        self.frame_requested = false;
        if self.navigation.is_some() {
            return false;
        }

        let boxes: Vec<HeadingBox> = self
            .outline
            .iter()
            .filter_map(|entry| host.heading_bounds(&entry.id))
            .collect();
        let viewport = Viewport {
            height: host.viewport_height(),
            scroll_offset: host.scroll_offset(),
            max_scroll_offset: host.max_scroll_offset(),
        };

        match compute_active(&boxes, &viewport, &self.settings) {
            Some(id) if self.active_id.as_deref() != Some(id.as_str()) => {
                self.active_id = Some(id);
                true
            }
            _ => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Scroll to the heading with `id`.
    ///
    /// The heading becomes active immediately. Scroll tracking is suspended
    /// until the verification timer fires; a newer navigation replaces this
    /// one's timer.
    pub fn navigate_to<H: ScrollHost + ?Sized>(&mut self, now: Duration, id: &str, host: &mut H) {
        if self.torn_down {
            return;
        }
        if self.timers.cancel(&NavTimer::NavigationCheck) {
            debug!("Navigation to {} supersedes a pending one", id);
        }

        self.active_id = Some(id.to_string());
        if let Some(index) = self.outline.iter().position(|e| e.id == id) {
            self.focused = Some(index);
        }
        self.frame_requested = false;
        self.navigation = Some(PendingNavigation {
            id: id.to_string(),
            start_offset: host.scroll_offset(),
        });

        host.smooth_scroll_to(id);
        let due = now + Duration::from_millis(self.settings.navigation_timeout_ms);
        self.timers.schedule(NavTimer::NavigationCheck, due);
    }

    fn finish_navigation<H: ScrollHost + ?Sized>(&mut self, host: &mut H) {
        let Some(navigation) = self.navigation.take() else {
            return;
        };

        let moved = (host.scroll_offset() - navigation.start_offset).abs();
        if moved <= self.settings.scroll_tolerance {
            match host.heading_bounds(&navigation.id) {
                Some(bounds) => {
                    let max = host.max_scroll_offset().max(0.0);
                    let target = (bounds.center() + host.scroll_offset()
                        - host.viewport_height() / 2.0)
                        .clamp(0.0, max);
                    debug!(
                        "Smooth scroll to {} did not move the page; jumping to {}",
                        navigation.id, target
                    );
                    host.scroll_to(target);
                }
                None => warn!("Navigation target {} is not in the page", navigation.id),
            }
        }

        host.replace_fragment(&navigation.id);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clock
    // ─────────────────────────────────────────────────────────────────────────

    /// Run every timer due at or before `now`.
    pub fn advance<S, H>(&mut self, now: Duration, source: &mut S, host: &mut H)
    where
        S: HeadingSource + ?Sized,
        H: ScrollHost + ?Sized,
    {
        if self.torn_down {
            return;
        }
        while let Some(timer) = self.timers.pop_due(now) {
            match timer {
                NavTimer::ScanFallback => {
                    if self.watching {
                        self.watching = false;
                        self.final_scan(source);
                    }
                }
                NavTimer::NavigationCheck => self.finish_navigation(host),
            }
        }
    }

    /// Cancel all timers, the mutation watch and any frame request. Every
    /// later call is a no-op.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.watching = false;
        self.frame_requested = false;
        self.navigation = None;
        self.torn_down = true;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
