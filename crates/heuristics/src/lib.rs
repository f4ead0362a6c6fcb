//! Tap suppression heuristics.
//!
//! Each heuristic is an independent, pure evaluator over a frozen
//! [`HeuristicSnapshot`]. The [`HeuristicSet`] runs all of them, collects
//! their features for the ranking model, and aggregates their verdicts:
//!
//! ```text
//! snapshot ──► every heuristic ──► SuppressionReport
//!                                     │
//!                 OR over enabled     │  features
//!                 suppressors         ▼
//!                          ┌──── RankingPredictor (optional, async)
//!                          ▼
//!                  SuppressionDecision
//! ```
//!
//! A heuristic verdict always wins. A ranking `Suppress` verdict is ignored
//! when an enabled heuristic asks to override it.

mod config;
mod features;
mod heuristic;
mod heuristics;
mod ranking;
mod set;
mod snapshot;

pub use config::HeuristicsConfig;
pub use features::{feature_names, CollectedFeatures, FeatureLogger, FeatureValue, HeuristicResult};
pub use heuristic::{Heuristic, HeuristicKind};
pub use heuristics::{
    EntityHeuristic, NotLongWordSuppression, RecentScrollSuppression, SecondTapMlOverride,
    ShortTextRunSuppression, ShortWordSuppression, SmallTextSuppression, TapDurationSuppression,
    TapFarFromPreviousSuppression, WordEdgeSuppression, CAMEL_CASE_PROPER_NOUN_LANGUAGES,
};
pub use ranking::{outcome_names, NullRankingPredictor, RankerVerdict, RankingPredictor};
pub use set::{Evaluation, HeuristicSet, SuppressionDecision, SuppressionReport};
pub use snapshot::HeuristicSnapshot;
