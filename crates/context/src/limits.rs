//! Selection limits and character classification.
//!
//! Centralizes the rules that decide whether a piece of page text is worth
//! searching for. This is the single source of truth for selection hygiene.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a selection that can be searched (chars).
pub const MAX_SELECTION_LENGTH: usize = 100;

/// At least one letter, number or connector must be present.
static WORD_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}_]").expect("word character pattern is valid"));

/// Outcome of checking a selection against the limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCheck {
    Valid,
    Empty,
    TooLong,
    NoWordCharacters,
    Editable,
}

impl SelectionCheck {
    pub fn is_valid(self) -> bool {
        self == SelectionCheck::Valid
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectionCheck::Valid => "valid",
            SelectionCheck::Empty => "empty",
            SelectionCheck::TooLong => "too_long",
            SelectionCheck::NoWordCharacters => "no_word_characters",
            SelectionCheck::Editable => "editable",
        }
    }
}

impl std::fmt::Display for SelectionCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Check a selection against the limits.
///
/// Order matters only for the reported reason: an editable selection is
/// rejected before its text is looked at.
pub fn check_selection(text: &str, in_editable: bool) -> SelectionCheck {
    if in_editable {
        return SelectionCheck::Editable;
    }
    if text.trim().is_empty() {
        return SelectionCheck::Empty;
    }
    if text.chars().count() > MAX_SELECTION_LENGTH {
        return SelectionCheck::TooLong;
    }
    if !contains_word_characters(text) {
        return SelectionCheck::NoWordCharacters;
    }
    SelectionCheck::Valid
}

pub fn contains_word_characters(text: &str) -> bool {
    WORD_CHARACTERS.is_match(text)
}

/// Characters that make up a word for tap analysis.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Ideographic scripts have no spaces between words, so tap analysis bails
/// out when it meets one.
pub fn is_ideographic(c: char) -> bool {
    matches!(
        c as u32,
        0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x3040..=0x30FF
            | 0x20000..=0x2A6DF
    )
}
