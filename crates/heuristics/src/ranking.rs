//! Contract for the learned ranking model.

use crate::features::FeatureValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Names of the outcomes reported to the ranker when a gesture ends.
pub mod outcome_names {
    pub const WAS_PANEL_OPENED: &str = "was_panel_opened";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankerVerdict {
    Show,
    Suppress,
    Undetermined,
}

impl RankerVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            RankerVerdict::Show => "show",
            RankerVerdict::Suppress => "suppress",
            RankerVerdict::Undetermined => "undetermined",
        }
    }
}

impl std::fmt::Display for RankerVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A model that decides whether a tap should be shown.
///
/// Features are pushed one at a time, then [`RankingPredictor::run_prediction`]
/// is awaited once per tap. Outcomes are logged when the gesture ends and
/// [`RankingPredictor::reset`] clears everything for the next tap.
#[async_trait]
pub trait RankingPredictor: Send + Sync {
    fn log_feature(&self, name: &str, value: FeatureValue);

    async fn run_prediction(&self) -> RankerVerdict;

    fn log_outcome(&self, name: &str, value: FeatureValue);

    fn reset(&self);
}

/// Predictor that never has an opinion.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRankingPredictor;

#[async_trait]
impl RankingPredictor for NullRankingPredictor {
    fn log_feature(&self, _name: &str, _value: FeatureValue) {}

    async fn run_prediction(&self) -> RankerVerdict {
        RankerVerdict::Undetermined
    }

    fn log_outcome(&self, _name: &str, _value: FeatureValue) {}

    fn reset(&self) {}
}
