//! Activation configuration.
//!
//! Built once, validated, then shared read-only (usually as `Arc`).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tapsearch_heuristics::HeuristicsConfig;

pub const DEFAULT_TAP_NEAR_PREVIOUS_WINDOW_MS: u64 = 100;
pub const DEFAULT_TAP_ON_TAP_SELECTION_WINDOW_MS: u64 = 100;

/// Windows the pipeline waits in before committing to a gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a cleared selection waits for a nearby tap before resetting.
    pub tap_near_previous_window_ms: u64,
    /// How long a tap waits for selection handles before committing.
    pub tap_on_tap_selection_window_ms: u64,
    /// Extra delay before showing tap UI; 0 disables it.
    pub wait_after_tap_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tap_near_previous_window_ms: DEFAULT_TAP_NEAR_PREVIOUS_WINDOW_MS,
            tap_on_tap_selection_window_ms: DEFAULT_TAP_ON_TAP_SELECTION_WINDOW_MS,
            wait_after_tap_delay_ms: 0,
        }
    }
}

impl TimingConfig {
    pub fn tap_near_previous_window(&self) -> Duration {
        Duration::from_millis(self.tap_near_previous_window_ms)
    }

    pub fn tap_on_tap_selection_window(&self) -> Duration {
        Duration::from_millis(self.tap_on_tap_selection_window_ms)
    }

    /// `None` when no delay is configured.
    pub fn wait_after_tap_delay(&self) -> Option<Duration> {
        (self.wait_after_tap_delay_ms > 0).then(|| Duration::from_millis(self.wait_after_tap_delay_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivationConfig {
    pub heuristics: HeuristicsConfig,
    pub timing: TimingConfig,
    /// Resolve taps through the search term resolver.
    pub resolve_enabled: bool,
    /// Consult the ranking predictor, if one is supplied.
    pub ranking_enabled: bool,
    /// Pixels to device-independent units.
    pub px_to_dp: f32,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            heuristics: HeuristicsConfig::default(),
            timing: TimingConfig::default(),
            resolve_enabled: true,
            ranking_enabled: true,
            px_to_dp: 1.0,
        }
    }
}

impl ActivationConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let timing = &self.timing;
        if timing.tap_near_previous_window_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "timing.tap_near_previous_window_ms",
            });
        }
        if timing.tap_on_tap_selection_window_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "timing.tap_on_tap_selection_window_ms",
            });
        }
        if !(self.px_to_dp.is_finite() && self.px_to_dp > 0.0) {
            return Err(ConfigError::InvalidFactor {
                field: "px_to_dp",
                value: self.px_to_dp,
            });
        }

        let h = &self.heuristics;
        if h.recent_scroll_threshold_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "heuristics.recent_scroll_threshold_ms",
            });
        }
        if h.tap_duration_threshold_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "heuristics.tap_duration_threshold_ms",
            });
        }
        if h.second_tap_min_delay_ms > h.second_tap_max_delay_ms {
            return Err(ConfigError::Inverted {
                min_field: "heuristics.second_tap_min_delay_ms",
                min: h.second_tap_min_delay_ms,
                max_field: "heuristics.second_tap_max_delay_ms",
                max: h.second_tap_max_delay_ms,
            });
        }
        for (field, value) in [
            ("heuristics.tap_far_from_previous_radius_dp", h.tap_far_from_previous_radius_dp),
            ("heuristics.second_tap_radius_dp", h.second_tap_radius_dp),
            ("heuristics.small_text_max_font_size_dips", h.small_text_max_font_size_dips),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidFactor { field, value });
            }
        }
        Ok(())
    }
}
