//! Selection state structures.

use crate::event::Position;
use serde::{Deserialize, Serialize};

/// How the current selection was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionType {
    Tap,
    LongPress,
    #[default]
    Undetermined,
}

impl SelectionType {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionType::Tap => "tap",
            SelectionType::LongPress => "long_press",
            SelectionType::Undetermined => "undetermined",
        }
    }
}

impl std::fmt::Display for SelectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Read-only view of the current selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub text: String,
    pub selection_type: SelectionType,
    pub start_offset: usize,
    pub end_offset: usize,
    pub position: Position,
    /// False for selections that are empty, too long, have no word
    /// characters, or sit in an editable field.
    pub valid: bool,
}

impl SelectionSnapshot {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Where and when a tap happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapPoint {
    pub position: Position,
    pub timestamp_nanos: u64,
}

/// The last tap that went through suppression.
///
/// Immutable: a new tap replaces the record instead of changing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TapRecord {
    x: f32,
    y: f32,
    tap_time_nanos: u64,
    was_suppressed_by_ranking: bool,
}

impl TapRecord {
    pub fn new(tap: TapPoint, was_suppressed_by_ranking: bool) -> Self {
        Self {
            x: tap.position.x,
            y: tap.position.y,
            tap_time_nanos: tap.timestamp_nanos,
            was_suppressed_by_ranking,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn tap_time_nanos(&self) -> u64 {
        self.tap_time_nanos
    }

    pub fn was_suppressed_by_ranking(&self) -> bool {
        self.was_suppressed_by_ranking
    }
}
