//! The heuristic contract.

use crate::features::{FeatureLogger, HeuristicResult};
use crate::snapshot::HeuristicSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    RecentScroll,
    TapFarFromPrevious,
    TapDuration,
    ShortWord,
    NotLongWord,
    WordEdge,
    Entity,
    ShortTextRun,
    SmallText,
    SecondTapMlOverride,
}

impl HeuristicKind {
    pub fn label(&self) -> &'static str {
        match self {
            HeuristicKind::RecentScroll => "recent_scroll",
            HeuristicKind::TapFarFromPrevious => "tap_far_from_previous",
            HeuristicKind::TapDuration => "tap_duration",
            HeuristicKind::ShortWord => "short_word",
            HeuristicKind::NotLongWord => "not_long_word",
            HeuristicKind::WordEdge => "word_edge",
            HeuristicKind::Entity => "entity",
            HeuristicKind::ShortTextRun => "short_text_run",
            HeuristicKind::SmallText => "small_text",
            HeuristicKind::SecondTapMlOverride => "second_tap_ml_override",
        }
    }
}

impl std::fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An independent evaluator of one suppression condition.
///
/// Implementations are pure over the snapshot. Every hook except
/// [`Heuristic::evaluate`] has a default.
pub trait Heuristic: Send + Sync {
    fn kind(&self) -> HeuristicKind;

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult;

    /// Report this heuristic's features. Called whether or not it is enabled.
    fn log_features(&self, result: &HeuristicResult, logger: &mut dyn FeatureLogger) {
        for (name, value) in &result.features {
            logger.log_feature(name, *value);
        }
    }

    /// Whether this result should neutralize a ranking `Suppress` verdict.
    fn should_override_ranking(&self, _result: &HeuristicResult) -> bool {
        false
    }

    /// False for heuristics whose satisfied condition argues for showing.
    /// Those only contribute features and never suppress.
    fn suppresses_when_satisfied(&self) -> bool {
        true
    }
}
