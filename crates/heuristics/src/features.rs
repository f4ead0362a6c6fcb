//! Feature values reported by heuristics.

use crate::heuristic::HeuristicKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Names of the features heuristics hand to the ranking model.
pub mod feature_names {
    pub const DURATION_AFTER_SCROLL_MS: &str = "duration_after_scroll_ms";
    pub const PREVIOUS_TAP_DISTANCE_DP: &str = "previous_tap_distance_dp";
    pub const WAS_PREVIOUS_TAP_FAR: &str = "was_previous_tap_far";
    pub const TAP_DURATION_MS: &str = "tap_duration_ms";
    pub const IS_SHORT_TAP: &str = "is_short_tap";
    pub const IS_SHORT_WORD: &str = "is_short_word";
    pub const IS_LONG_WORD: &str = "is_long_word";
    pub const IS_WORD_EDGE: &str = "is_word_edge";
    pub const IS_ENTITY: &str = "is_entity";
    pub const IS_ENTITY_ELIGIBLE: &str = "is_entity_eligible";
    pub const TEXT_RUN_WORD_RATIO: &str = "text_run_word_ratio";
    pub const FONT_SIZE_DIPS: &str = "font_size_dips";
    pub const IS_SMALL_TEXT: &str = "is_small_text";
    pub const IS_SECOND_TAP_OVERRIDE: &str = "is_second_tap_override";
}

/// A single feature value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Bool(bool),
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<u64> for FeatureValue {
    fn from(value: u64) -> Self {
        FeatureValue::Number(value as f64)
    }
}

impl From<u32> for FeatureValue {
    fn from(value: u32) -> Self {
        FeatureValue::Number(f64::from(value))
    }
}

impl From<f32> for FeatureValue {
    fn from(value: f32) -> Self {
        FeatureValue::Number(f64::from(value))
    }
}

/// Sink for heuristic features.
pub trait FeatureLogger {
    fn log_feature(&mut self, name: &str, value: FeatureValue);
}

/// In-memory feature sink, keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectedFeatures {
    features: BTreeMap<String, FeatureValue>,
}

impl CollectedFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.features.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FeatureValue)> {
        self.features.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FeatureLogger for CollectedFeatures {
    fn log_feature(&mut self, name: &str, value: FeatureValue) {
        self.features.insert(name.to_string(), value);
    }
}

/// Outcome of one heuristic for one tap.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicResult {
    pub kind: HeuristicKind,
    pub enabled_by_config: bool,
    pub condition_satisfied: bool,
    pub features: Vec<(&'static str, FeatureValue)>,
}

impl HeuristicResult {
    pub fn new(kind: HeuristicKind, enabled_by_config: bool, condition_satisfied: bool) -> Self {
        Self {
            kind,
            enabled_by_config,
            condition_satisfied,
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, name: &'static str, value: impl Into<FeatureValue>) -> Self {
        self.features.push((name, value.into()));
        self
    }

    /// Satisfied and switched on.
    pub fn is_active(&self) -> bool {
        self.enabled_by_config && self.condition_satisfied
    }
}
