use crate::config::HeuristicsConfig;
use crate::features::{feature_names, HeuristicResult};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::snapshot::HeuristicSnapshot;

/// Suppresses taps that land right after a scroll.
///
/// Such taps are usually the end of a fling, not a deliberate selection.
#[derive(Debug, Clone)]
pub struct RecentScrollSuppression {
    enabled: bool,
    threshold_ms: u64,
}

impl RecentScrollSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.recent_scroll_enabled,
            threshold_ms: config.recent_scroll_threshold_ms,
        }
    }
}

impl Heuristic for RecentScrollSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::RecentScroll
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let since_scroll = snapshot.millis_since_last_scroll();
        let satisfied = since_scroll.is_some_and(|ms| ms < self.threshold_ms);
        let result = HeuristicResult::new(self.kind(), self.enabled, satisfied);
        match since_scroll {
            Some(ms) => result.with_feature(feature_names::DURATION_AFTER_SCROLL_MS, ms),
            None => result,
        }
    }
}
