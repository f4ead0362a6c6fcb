//! Heuristics over the tapped word.
//!
//! All of these need word analysis; without it they are never satisfied.

use crate::config::HeuristicsConfig;
use crate::features::{feature_names, HeuristicResult};
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::snapshot::HeuristicSnapshot;

fn tapped_word_len(snapshot: &HeuristicSnapshot<'_>) -> Option<usize> {
    snapshot.context?.tapped_word().map(|w| w.len())
}

#[derive(Debug, Clone)]
pub struct ShortWordSuppression {
    enabled: bool,
    max_length: usize,
}

impl ShortWordSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.short_word_enabled,
            max_length: config.short_word_max_length,
        }
    }
}

impl Heuristic for ShortWordSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::ShortWord
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let satisfied = tapped_word_len(snapshot).is_some_and(|len| len <= self.max_length);
        HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::IS_SHORT_WORD, satisfied)
    }
}

/// Suppresses anything that is not a long word.
#[derive(Debug, Clone)]
pub struct NotLongWordSuppression {
    enabled: bool,
    min_length: usize,
}

impl NotLongWordSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.not_long_word_enabled,
            min_length: config.long_word_min_length,
        }
    }
}

impl Heuristic for NotLongWordSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::NotLongWord
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let len = tapped_word_len(snapshot);
        let satisfied = len.is_some_and(|len| len < self.min_length);
        let is_long = len.is_some_and(|len| len >= self.min_length);
        HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::IS_LONG_WORD, is_long)
    }
}

/// Suppresses taps on the outer quarter of a word.
#[derive(Debug, Clone)]
pub struct WordEdgeSuppression {
    enabled: bool,
    min_length: usize,
}

impl WordEdgeSuppression {
    pub fn new(config: &HeuristicsConfig) -> Self {
        Self {
            enabled: config.word_edge_enabled,
            min_length: config.word_edge_min_length,
        }
    }
}

impl Heuristic for WordEdgeSuppression {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::WordEdge
    }

    fn evaluate(&self, snapshot: &HeuristicSnapshot<'_>) -> HeuristicResult {
        let satisfied = snapshot
            .context
            .and_then(|context| Some((context.tapped_word()?.len(), context.tapped_word_offset()?)))
            .is_some_and(|(len, offset)| {
                len >= self.min_length && (offset * 4 < len || offset * 4 >= len * 3)
            });
        HeuristicResult::new(self.kind(), self.enabled, satisfied)
            .with_feature(feature_names::IS_WORD_EDGE, satisfied)
    }
}
