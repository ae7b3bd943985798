//! User settings for folio
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence. Settings are loaded once
//! at startup and handed to the components that need them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Export Language
// ─────────────────────────────────────────────────────────────────────────────

/// Content language of an exported document; part of the export file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl Lang {
    /// The language code used in file names.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ar => "ar",
        }
    }

    /// Get all supported languages.
    pub fn all() -> &'static [Lang] {
        &[Lang::En, Lang::Ar]
    }

    /// Parse a language code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Lang> {
        Lang::all()
            .iter()
            .copied()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Heading Navigator
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning for heading discovery, active-heading tracking and navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorSettings {
    /// Height of the sticky header covering the top of the viewport
    pub sticky_header_offset: f32,

    /// Distance from the bottom of the page at which the last heading is
    /// forced active
    pub bottom_threshold: f32,

    /// Scroll movement at or below which a navigation is treated as not
    /// having happened
    pub scroll_tolerance: f32,

    /// Delay before the fallback rescan when the first scan finds nothing
    pub scan_fallback_ms: u64,

    /// Time a smooth scroll gets before it is verified
    pub navigation_timeout_ms: u64,

    /// Deepest heading tag (`h1`..`hN`) included in the outline
    pub max_heading_level: u32,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            sticky_header_offset: 120.0,
            bottom_threshold: 50.0,
            scroll_tolerance: 5.0,
            scan_fallback_ms: 500,
            navigation_timeout_ms: 1000,
            max_heading_level: 3,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export
// ─────────────────────────────────────────────────────────────────────────────

/// Markdown export preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Language used when an export does not name one
    pub default_lang: Lang,

    /// Directory exports are written to (current directory if unset)
    pub output_dir: Option<PathBuf>,

    /// Bullet list marker (`-`, `*` or `+`)
    pub bullet_marker: char,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_lang: Lang::default(),
            output_dir: None,
            bullet_marker: '-',
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Heading navigator tuning
    pub navigator: NavigatorSettings,

    /// Markdown export preferences
    pub export: ExportSettings,

    /// How long a status notice stays up
    pub notice_clear_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            navigator: NavigatorSettings::default(),
            export: ExportSettings::default(),
            notice_clear_ms: 3000,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Maximum sticky header offset.
    pub const MAX_HEADER_OFFSET: f32 = 2000.0;
    /// Maximum bottom threshold and scroll tolerance.
    pub const MAX_DISTANCE: f32 = 1000.0;
    /// Minimum wait for any timer-driven step.
    pub const MIN_DELAY_MS: u64 = 10;
    /// Maximum wait for any timer-driven step.
    pub const MAX_DELAY_MS: u64 = 60_000;
    /// Deepest heading level an outline can include.
    pub const MAX_HEADING_LEVEL: u32 = 6;
    /// Bullet markers the exporter can write.
    pub const BULLET_MARKERS: [char; 3] = ['-', '*', '+'];

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        let nav = &mut self.navigator;

        // NaN from a hand-edited file falls back to the default
        let defaults = NavigatorSettings::default();
        if nav.sticky_header_offset.is_nan() {
            nav.sticky_header_offset = defaults.sticky_header_offset;
        }
        if nav.bottom_threshold.is_nan() {
            nav.bottom_threshold = defaults.bottom_threshold;
        }
        if nav.scroll_tolerance.is_nan() {
            nav.scroll_tolerance = defaults.scroll_tolerance;
        }

        nav.sticky_header_offset = nav
            .sticky_header_offset
            .clamp(0.0, Self::MAX_HEADER_OFFSET);
        nav.bottom_threshold = nav.bottom_threshold.clamp(0.0, Self::MAX_DISTANCE);
        nav.scroll_tolerance = nav.scroll_tolerance.clamp(0.0, Self::MAX_DISTANCE);

        nav.scan_fallback_ms = nav
            .scan_fallback_ms
            .clamp(Self::MIN_DELAY_MS, Self::MAX_DELAY_MS);
        nav.navigation_timeout_ms = nav
            .navigation_timeout_ms
            .clamp(Self::MIN_DELAY_MS, Self::MAX_DELAY_MS);

        nav.max_heading_level = nav.max_heading_level.clamp(1, Self::MAX_HEADING_LEVEL);

        if !Self::BULLET_MARKERS.contains(&self.export.bullet_marker) {
            self.export.bullet_marker = '-';
        }

        self.notice_clear_ms = self
            .notice_clear_ms
            .clamp(Self::MIN_DELAY_MS, Self::MAX_DELAY_MS);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
