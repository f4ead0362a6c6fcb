//! Heuristics over the tap itself and the tap before it.

use crate::config::HeuristicsConfig;
use crate::features::{feature_names, HeuristicResult};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::snapshot::HeuristicSnapshot;

/// Suppresses a tap far from a previous tap whose selection is still shown.
///
/// Tapping elsewhere while a tap selection is visible usually means "dismiss",
/// not "search this too".
#[derive(Debug, Clone)]
pub struct TapFarFromPreviousSuppression {
    enabled: bool,
    radius_dp: f32,
}

impl TapFarFromPreviousSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.tap_far_from_previous_enabled,
            radius_dp: config.tap_far_from_previous_radius_dp,
        }
    }
}

impl Heuristic for TapFarFromPreviousSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::TapFarFromPrevious
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let distance = snapshot.distance_from_previous_dp();
        let is_far = distance.is_some_and(|d| d > self.radius_dp);
        let satisfied = snapshot.previous_tap_selection_visible && is_far;

        let result = HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::WAS_PREVIOUS_TAP_FAR, is_far);
        match distance {
            Some(d) => result.with_feature(feature_names::PREVIOUS_TAP_DISTANCE_DP, d),
            None => result,
        }
    }
}

/// Suppresses very short contacts, which tend to be accidental brushes.
#[derive(Debug, Clone)]
pub struct TapDurationSuppression {
    enabled: bool,
    threshold_ms: u64,
}

impl TapDurationSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.tap_duration_enabled,
            threshold_ms: config.tap_duration_threshold_ms,
        }
    }
}

impl Heuristic for TapDurationSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::TapDuration
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let duration = snapshot.metadata.tap_duration_ms;
        // Zero means the platform did not measure it.
        let satisfied = duration > 0 && duration < self.threshold_ms;
        HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::TAP_DURATION_MS, duration)
            .with_feature(feature_names::IS_SHORT_TAP, satisfied)
    }
}

/// Lets a second tap near a ranking-suppressed tap through.
///
/// When the model suppressed the previous tap and the user taps again close
/// by within a short window, they clearly want the panel.
#[derive(Debug, Clone)]
pub struct SecondTapMlOverride {
    enabled: bool,
    min_delay_ms: u64,
    max_delay_ms: u64,
    radius_dp: f32,
}

impl SecondTapMlOverride {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.second_tap_override_enabled,
            min_delay_ms: config.second_tap_min_delay_ms,
            max_delay_ms: config.second_tap_max_delay_ms,
            radius_dp: config.second_tap_radius_dp,
        }
    }
}

impl Heuristic for SecondTapMlOverride {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::SecondTapMlOverride
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let was_suppressed = snapshot
            .previous_tap
            .is_some_and(|previous| previous.was_suppressed_by_ranking());
        let in_window = snapshot
            .millis_since_previous_tap()
            .is_some_and(|ms| (self.min_delay_ms..=self.max_delay_ms).contains(&ms));
        let is_near = snapshot
            .distance_from_previous_dp()
            .is_some_and(|d| d <= self.radius_dp);

        let satisfied = was_suppressed && in_window && is_near;
        HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::IS_SECOND_TAP_OVERRIDE, satisfied)
    }

    fn should_override_ranking(&self, result: &HeuristicResult) -> bool {
        result.is_active()
    }

    fn suppresses_when_satisfied(&self) -> bool {
        false
    }
}
