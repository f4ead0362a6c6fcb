//! Running heuristics together and combining their verdicts.

use crate::config::HeuristicsConfig;
use crate::features::{CollectedFeatures, HeuristicResult};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::heuristics::{
    EntityHeuristic, NotLongWordSuppression, RecentScrollSuppression, SecondTapMlOverride,
    ShortTextRunSuppression, ShortWordSuppression, SmallTextSuppression, TapDurationSuppression,
    TapFarFromPreviousSuppression, WordEdgeSuppression,
};
use crate::ranking::RankerVerdict;
use crate::snapshot::HeuristicSnapshot;

/// One heuristic's result with the hooks already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: HeuristicResult,
    pub suppresses: bool,
    pub overrides_ranking: bool,
}

/// All heuristic results for one tap.
#[derive(Debug, Clone, Default)]
pub struct SuppressionReport {
    evaluations: Vec<Evaluation>,
    features: CollectedFeatures,
}

impl SuppressionReport {
    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    /// Features from every heuristic, enabled or not.
    pub fn features(&self) -> &CollectedFeatures {
        &self.features
    }

    /// Enabled heuristics whose condition argues for suppression.
    pub fn suppressing(&self) -> Vec<HeuristicKind> {
        self.evaluations
            .iter()
            .filter(|e| e.suppresses)
            .map(|e| e.result.kind)
            .collect()
    }

    pub fn is_suppressed_by_heuristics(&self) -> bool {
        self.evaluations.iter().any(|e| e.suppresses)
    }

    pub fn overrides_ranking(&self) -> bool {
        self.evaluations.iter().any(|e| e.overrides_ranking)
    }

    /// The ranker is only consulted when heuristics left the tap alone.
    pub fn needs_ranking(&self) -> bool {
        !self.is_suppressed_by_heuristics()
    }

    /// Combine heuristic verdicts with an optional ranker verdict.
    pub fn decide(&self, verdict: Option<RankerVerdict>) -> SuppressionDecision {
        let suppressing = self.suppressing();
        if !suppressing.is_empty() {
            return SuppressionDecision::SuppressedByHeuristics(suppressing);
        }
        match verdict {
            Some(RankerVerdict::Suppress) if self.overrides_ranking() => {
                SuppressionDecision::ShowOverridingRanking
            }
            Some(RankerVerdict::Suppress) => SuppressionDecision::SuppressedByRanking,
            _ => SuppressionDecision::Show,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressionDecision {
    Show,
    /// The ranker said suppress but a heuristic overrode it.
    ShowOverridingRanking,
    SuppressedByHeuristics(Vec<HeuristicKind>),
    SuppressedByRanking,
}

impl SuppressionDecision {
    pub fn is_suppressed(&self) -> bool {
        matches!(
            self,
            SuppressionDecision::SuppressedByHeuristics(_) | SuppressionDecision::SuppressedByRanking
        )
    }

    pub fn was_suppressed_by_ranking(&self) -> bool {
        matches!(self, SuppressionDecision::SuppressedByRanking)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SuppressionDecision::Show => "show",
            SuppressionDecision::ShowOverridingRanking => "show_overriding_ranking",
            SuppressionDecision::SuppressedByHeuristics(_) => "suppressed_by_heuristics",
            SuppressionDecision::SuppressedByRanking => "suppressed_by_ranking",
        }
    }
}

/// Ordered collection of heuristics.
pub struct HeuristicSet {
    heuristics: Vec<Box<dyn Heuristic>>,
}

impl HeuristicSet {
    pub fn new() -> Self {
        Self {
            heuristics: Vec::new(),
        }
    }

    /// Every built-in heuristic, configured from `config`.
    pub fn from_config(config: &HeuristicsConfig) -> Self {
        Self::new()
            .with(RecentScrollSuppression::new(config))
            .with(TapFarFromPreviousSuppression::new(config))
            .with(TapDurationSuppression::new(config))
            .with(ShortWordSuppression::new(config))
            .with(NotLongWordSuppression::new(config))
            .with(WordEdgeSuppression::new(config))
            .with(EntityHeuristic::new(config))
            .with(ShortTextRunSuppression::new(config))
            .with(SmallTextSuppression::new(config))
            .with(SecondTapMlOverride::new(config))
    }

    pub fn with(mut self, heuristic: impl Heuristic + 'static) -> Self {
        self.push(Box::new(heuristic));
        self
    }

    pub fn push(&mut self, heuristic: Box<dyn Heuristic>) {
        self.heuristics.push(heuristic);
    }

    pub fn len(&self) -> usize {
        self.heuristics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heuristics.is_empty()
    }

    pub fn kinds(&self) -> Vec<HeuristicKind> {
        self.heuristics.iter().map(|h| h.kind()).collect()
    }

    /// Evaluate every heuristic against the snapshot.
    pub fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> SuppressionReport {
        let mut report = SuppressionReport::default();
        for heuristic in &self.heuristics {
            let result = heuristic.evaluate(snapshot);
            heuristic.log_features(&result, &mut report.features);

            let suppresses = result.is_active() && heuristic.suppresses_when_satisfied();
            let overrides_ranking = heuristic.should_override_ranking(&result);
            if result.condition_satisfied {
                tracing::debug!(
                    heuristic = %result.kind,
                    enabled = result.enabled_by_config,
                    suppresses,
                    overrides_ranking,
                    "heuristic satisfied"
                );
            }
            report.evaluations.push(Evaluation {
                result,
                suppresses,
                overrides_ranking,
            });
        }
        report
    }
}

impl Default for HeuristicSet {
    fn default() -> Self {
        Self::from_config(&HeuristicsConfig::default())
    }
}

impl std::fmt::Debug for HeuristicSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeuristicSet")
            .field("heuristics", &self.kinds())
            .finish()
    }
}
