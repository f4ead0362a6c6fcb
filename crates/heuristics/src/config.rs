//! Heuristic toggles and thresholds.

use serde::{Deserialize, Serialize};

/// Scroll ending less than this before a tap counts as recent.
pub const DEFAULT_RECENT_SCROLL_THRESHOLD_MS: u64 = 300;

/// Distance from the previous tap beyond which a tap is a fresh gesture.
pub const DEFAULT_TAP_FAR_RADIUS_DP: f32 = 75.0;

/// Taps shorter than this are "short contact".
pub const DEFAULT_TAP_DURATION_THRESHOLD_MS: u64 = 70;

pub const DEFAULT_SHORT_WORD_MAX_LENGTH: usize = 3;

pub const DEFAULT_LONG_WORD_MIN_LENGTH: usize = 10;

pub const DEFAULT_WORD_EDGE_MIN_LENGTH: usize = 4;

/// Cutoff on the 1..=10 word-to-run ratio scale.
pub const DEFAULT_SHORT_TEXT_RUN_RATIO_CUTOFF: u32 = 3;

pub const DEFAULT_SMALL_TEXT_MAX_FONT_SIZE_DIPS: f32 = 15.0;

pub const DEFAULT_SECOND_TAP_MIN_DELAY_MS: u64 = 200;

pub const DEFAULT_SECOND_TAP_MAX_DELAY_MS: u64 = 3000;

pub const DEFAULT_SECOND_TAP_RADIUS_DP: f32 = 30.0;

/// Configuration for every heuristic.
///
/// All heuristics are disabled by default. A disabled heuristic still runs
/// and logs its features; it just never changes the decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicsConfig {
    pub recent_scroll_enabled: bool,
    pub recent_scroll_threshold_ms: u64,

    pub tap_far_from_previous_enabled: bool,
    pub tap_far_from_previous_radius_dp: f32,

    pub tap_duration_enabled: bool,
    pub tap_duration_threshold_ms: u64,

    pub short_word_enabled: bool,
    pub short_word_max_length: usize,

    pub not_long_word_enabled: bool,
    pub long_word_min_length: usize,

    pub word_edge_enabled: bool,
    pub word_edge_min_length: usize,

    pub entity_enabled: bool,

    pub short_text_run_enabled: bool,
    pub short_text_run_ratio_cutoff: u32,

    pub small_text_enabled: bool,
    pub small_text_max_font_size_dips: f32,

    pub second_tap_override_enabled: bool,
    pub second_tap_min_delay_ms: u64,
    pub second_tap_max_delay_ms: u64,
    pub second_tap_radius_dp: f32,
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            recent_scroll_enabled: false,
            recent_scroll_threshold_ms: DEFAULT_RECENT_SCROLL_THRESHOLD_MS,
            tap_far_from_previous_enabled: false,
            tap_far_from_previous_radius_dp: DEFAULT_TAP_FAR_RADIUS_DP,
            tap_duration_enabled: false,
            tap_duration_threshold_ms: DEFAULT_TAP_DURATION_THRESHOLD_MS,
            short_word_enabled: false,
            short_word_max_length: DEFAULT_SHORT_WORD_MAX_LENGTH,
            not_long_word_enabled: false,
            long_word_min_length: DEFAULT_LONG_WORD_MIN_LENGTH,
            word_edge_enabled: false,
            word_edge_min_length: DEFAULT_WORD_EDGE_MIN_LENGTH,
            entity_enabled: false,
            short_text_run_enabled: false,
            short_text_run_ratio_cutoff: DEFAULT_SHORT_TEXT_RUN_RATIO_CUTOFF,
            small_text_enabled: false,
            small_text_max_font_size_dips: DEFAULT_SMALL_TEXT_MAX_FONT_SIZE_DIPS,
            second_tap_override_enabled: false,
            second_tap_min_delay_ms: DEFAULT_SECOND_TAP_MIN_DELAY_MS,
            second_tap_max_delay_ms: DEFAULT_SECOND_TAP_MAX_DELAY_MS,
            second_tap_radius_dp: DEFAULT_SECOND_TAP_RADIUS_DP,
        }
    }
}

impl HeuristicsConfig {
    /// Config with every heuristic switched on and default thresholds.
    pub fn all_enabled() -> Self {
        Self {
            recent_scroll_enabled: true,
            tap_far_from_previous_enabled: true,
            tap_duration_enabled: true,
            short_word_enabled: true,
            not_long_word_enabled: true,
            word_edge_enabled: true,
            entity_enabled: true,
            short_text_run_enabled: true,
            small_text_enabled: true,
            second_tap_override_enabled: true,
            ..Self::default()
        }
    }
}
