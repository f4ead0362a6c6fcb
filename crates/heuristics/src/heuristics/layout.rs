//! Heuristics over how the tapped text is laid out on the page.

use crate::config::HeuristicsConfig;
use crate::features::{feature_names, HeuristicResult};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::snapshot::HeuristicSnapshot;

/// Suppresses taps on words that fill most of a short text run, such as
/// button labels and menu items.
#[derive(Debug, Clone)]
pub struct ShortTextRunSuppression {
    enabled: bool,
    ratio_cutoff: u32,
}

impl ShortTextRunSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.short_text_run_enabled,
            ratio_cutoff: config.short_text_run_ratio_cutoff,
        }
    }
}

/// Word length over run length on a 1..=10 scale.
fn word_to_run_ratio(word_len: usize, run_len: usize) -> u32 {
    let tenths = (10 * word_len).div_ceil(run_len);
    tenths.clamp(1, 10) as u32
}

impl Heuristic for ShortTextRunSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::ShortTextRun
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let run_len = snapshot.metadata.text_run_length;
        let ratio = snapshot
            .context
            .and_then(|context| context.tapped_word())
            .filter(|_| run_len > 0)
            .map(|word| word_to_run_ratio(word.len(), run_len));

        let satisfied = ratio.is_some_and(|r| r >= self.ratio_cutoff);
        let result = HeuristicResult::new(self.kind(), self.enabled, satisfied);
        match ratio {
            Some(r) => result.with_feature(feature_names::TEXT_RUN_WORD_RATIO, r),
            None => result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmallTextSuppression {
    enabled: bool,
    max_font_size_dips: f32,
}

impl SmallTextSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.small_text_enabled,
            max_font_size_dips: config.small_text_max_font_size_dips,
        }
    }
}

impl Heuristic for SmallTextSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::SmallText
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let size = snapshot.metadata.font_size_dips;
        let satisfied = size > 0.0 && size < self.max_font_size_dips;
        HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::FONT_SIZE_DIPS, size)
            .with_feature(feature_names::IS_SMALL_TEXT, satisfied)
    }
}
