//! Per-gesture context structures.

use crate::analysis::{analyze_tap, Word, WordAnalysis};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response of a surrounding-text request.
///
/// Offsets are `char` offsets into `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurroundingText {
    /// Encoding the page declared for this text (e.g., "UTF-8").
    #[serde(default)]
    pub encoding: String,

    pub text: String,

    pub selection_start: usize,

    pub selection_end: usize,

    /// Language the page declares for this content, if any.
    #[serde(default)]
    pub content_language: Option<String>,
}

impl SurroundingText {
    pub fn new(
        encoding: impl Into<String>,
        text: impl Into<String>,
        selection_start: usize,
        selection_end: usize,
    ) -> Self {
        Self {
            encoding: encoding.into(),
            text: text.into(),
            selection_start,
            selection_end,
            content_language: None,
        }
    }

    pub fn with_content_language(mut self, language: impl Into<String>) -> Self {
        self.content_language = Some(language.into());
        self
    }

    /// Empty text (with zero offsets, or offsets that point outside the text)
    /// cannot drive a search.
    pub fn is_degenerate(&self) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let len = self.text.chars().count();
        self.selection_start > self.selection_end || self.selection_end > len
    }
}

/// Everything known about the page around the current gesture.
///
/// Built fresh for each gesture sequence and dropped when the pipeline goes
/// back to idle.
#[derive(Debug, Clone)]
pub struct Context {
    sequence_id: Uuid,
    encoding: String,
    surrounding_text: String,
    chars: Vec<char>,
    selection_start: usize,
    selection_end: usize,
    /// Set once word analysis ran; `None` means offsets are not meaningful yet.
    analysis: Option<WordAnalysis>,
    detected_language: Option<String>,
}

impl Context {
    pub fn new(sequence_id: Uuid) -> Self {
        Self {
            sequence_id,
            encoding: String::new(),
            surrounding_text: String::new(),
            chars: Vec::new(),
            selection_start: 0,
            selection_end: 0,
            analysis: None,
            detected_language: None,
        }
    }

    pub fn sequence_id(&self) -> Uuid {
        self.sequence_id
    }

    /// Install the surrounding text. Any earlier word analysis is discarded.
    pub fn set_surrounding_text(&mut self, surrounding: SurroundingText) {
        self.chars = surrounding.text.chars().collect();
        self.selection_start = surrounding.selection_start.min(self.chars.len());
        self.selection_end = surrounding.selection_end.clamp(self.selection_start, self.chars.len());
        self.encoding = surrounding.encoding;
        self.surrounding_text = surrounding.text;
        self.analysis = None;
        if let Some(language) = surrounding.content_language {
            self.detected_language = Some(language);
        }
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn surrounding_text(&self) -> &str {
        &self.surrounding_text
    }

    pub fn selection_start(&self) -> usize {
        self.selection_start
    }

    pub fn selection_end(&self) -> usize {
        self.selection_end
    }

    /// Text between the selection offsets.
    pub fn selected_text(&self) -> String {
        self.chars[self.selection_start..self.selection_end]
            .iter()
            .collect()
    }

    /// Run word analysis around a tap at `tap_offset`.
    pub fn analyze_tap(&mut self, tap_offset: usize) {
        let analysis = analyze_tap(&self.chars, tap_offset);
        tracing::trace!(
            sequence_id = %self.sequence_id,
            tap_offset,
            tapped_word = ?analysis.tapped_word.as_ref().map(|w| w.text.as_str()),
            "tap analyzed"
        );
        self.analysis = Some(analysis);
    }

    pub fn is_analyzed(&self) -> bool {
        self.analysis.is_some()
    }

    pub fn tapped_word(&self) -> Option<&Word> {
        self.analysis.as_ref()?.tapped_word.as_ref()
    }

    /// Offset of the tap within the tapped word.
    pub fn tapped_word_offset(&self) -> Option<usize> {
        self.analysis.as_ref()?.tapped_word_offset()
    }

    pub fn word_before(&self) -> Option<&Word> {
        self.analysis.as_ref()?.word_before.as_ref()
    }

    pub fn word_after(&self) -> Option<&Word> {
        self.analysis.as_ref()?.word_after.as_ref()
    }

    /// Char at `offset`, if any.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// Move the selection to the tapped word.
    ///
    /// Returns false when no word was found under the tap.
    pub fn select_tapped_word(&mut self) -> bool {
        let Some((start, end)) = self.tapped_word().map(|w| (w.start, w.end())) else {
            return false;
        };
        self.selection_start = start;
        self.selection_end = end;
        true
    }

    /// Grow (negative start / positive end) or shrink the selection.
    ///
    /// Returns false and leaves the selection untouched when the adjusted
    /// range would be empty or fall outside the surrounding text.
    pub fn adjust_selection(&mut self, start_adjust: i32, end_adjust: i32) -> bool {
        let start = self.selection_start as i64 + i64::from(start_adjust);
        let end = self.selection_end as i64 + i64::from(end_adjust);
        if start < 0 || end > self.chars.len() as i64 || start >= end {
            tracing::debug!(
                start_adjust,
                end_adjust,
                "ignoring selection adjustment outside surrounding text"
            );
            return false;
        }
        self.selection_start = start as usize;
        self.selection_end = end as usize;
        true
    }

    pub fn detected_language(&self) -> Option<&str> {
        self.detected_language.as_deref()
    }

    pub fn set_detected_language(&mut self, language: impl Into<String>) {
        let language = language.into();
        if !language.is_empty() {
            self.detected_language = Some(language);
        }
    }
}
