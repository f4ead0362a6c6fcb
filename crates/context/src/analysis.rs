//! Word analysis around a tap offset.
//!
//! Pure functions over the surrounding text, expressed in `char` offsets.

use crate::limits::{is_ideographic, is_word_char};
use serde::{Deserialize, Serialize};

/// A word found in the surrounding text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    /// Offset of the first char of the word in the surrounding text.
    pub start: usize,
}

impl Word {
    fn from_range(chars: &[char], start: usize, end: usize) -> Self {
        Self {
            text: chars[start..end].iter().collect(),
            start,
        }
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Offset one past the last char of the word.
    pub fn end(&self) -> usize {
        self.start + self.len()
    }
}

/// Result of analyzing a tap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordAnalysis {
    pub tap_offset: usize,
    pub tapped_word: Option<Word>,
    pub word_before: Option<Word>,
    pub word_after: Option<Word>,
}

impl WordAnalysis {
    /// Offset of the tap within the tapped word.
    pub fn tapped_word_offset(&self) -> Option<usize> {
        self.tapped_word
            .as_ref()
            .map(|word| self.tap_offset.saturating_sub(word.start))
    }
}

/// Analyze the word under `tap_offset` and its neighbors.
pub fn analyze_tap(chars: &[char], tap_offset: usize) -> WordAnalysis {
    let tapped_word = find_word_at(chars, tap_offset);
    let (word_before, word_after) = match &tapped_word {
        Some(word) => (
            find_word_before(chars, word.start),
            find_word_after(chars, word.end()),
        ),
        None => (None, None),
    };

    WordAnalysis {
        tap_offset,
        tapped_word,
        word_before,
        word_after,
    }
}

/// Find the word containing `offset`, or ending right at it.
fn find_word_at(chars: &[char], offset: usize) -> Option<Word> {
    if offset > chars.len() {
        return None;
    }

    let mut start = offset;
    while start > 0 {
        let c = chars[start - 1];
        if is_ideographic(c) {
            return None;
        }
        if !is_word_char(c) {
            break;
        }
        start -= 1;
    }

    let mut end = offset;
    while end < chars.len() {
        let c = chars[end];
        if is_ideographic(c) {
            return None;
        }
        if !is_word_char(c) {
            break;
        }
        end += 1;
    }

    (start < end).then(|| Word::from_range(chars, start, end))
}

/// Find the closest word ending before `offset`.
fn find_word_before(chars: &[char], offset: usize) -> Option<Word> {
    let mut end = offset.min(chars.len());
    while end > 0 && !is_word_char(chars[end - 1]) {
        end -= 1;
    }
    if end == 0 {
        return None;
    }

    let mut start = end;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }
    if chars[start..end].iter().any(|&c| is_ideographic(c)) {
        return None;
    }
    Some(Word::from_range(chars, start, end))
}

/// Find the closest word starting at or after `offset`.
fn find_word_after(chars: &[char], offset: usize) -> Option<Word> {
    let mut start = offset;
    while start < chars.len() && !is_word_char(chars[start]) {
        start += 1;
    }
    if start >= chars.len() {
        return None;
    }

    let mut end = start;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    if chars[start..end].iter().any(|&c| is_ideographic(c)) {
        return None;
    }
    Some(Word::from_range(chars, start, end))
}
