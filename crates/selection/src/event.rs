//! Input events delivered by the platform layer.

use serde::{Deserialize, Serialize};

/// A point on the displayed document, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Tap,
    LongPress,
    ScrollStart,
    ScrollEnd,
    SelectionCleared,
    SelectionHandlesShown,
}

impl GestureKind {
    pub fn label(&self) -> &'static str {
        match self {
            GestureKind::Tap => "tap",
            GestureKind::LongPress => "long_press",
            GestureKind::ScrollStart => "scroll_start",
            GestureKind::ScrollEnd => "scroll_end",
            GestureKind::SelectionCleared => "selection_cleared",
            GestureKind::SelectionHandlesShown => "selection_handles_shown",
        }
    }
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A raw gesture notification. Consumed once by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub position: Position,
    /// Monotonic timestamp of the event.
    pub timestamp_nanos: u64,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, position: Position, timestamp_nanos: u64) -> Self {
        Self {
            kind,
            position,
            timestamp_nanos,
        }
    }

    pub fn tap(x: f32, y: f32, timestamp_nanos: u64) -> Self {
        Self::new(GestureKind::Tap, Position::new(x, y), timestamp_nanos)
    }
}

/// Per-tap facts measured by the platform, used only by heuristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TapMetadata {
    /// Font size of the tapped text in device-independent units; 0 when unknown.
    #[serde(default)]
    pub font_size_dips: f32,

    /// Length of the structural text run containing the tap; 0 when unknown.
    #[serde(default)]
    pub text_run_length: usize,

    /// Time between touch down and touch up.
    #[serde(default)]
    pub tap_duration_ms: u64,

    /// Whether the tap landed on an editable field.
    #[serde(default)]
    pub in_editable: bool,
}

/// A selection change reported by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub text: String,
    #[serde(default)]
    pub start_offset: usize,
    #[serde(default)]
    pub end_offset: usize,
    #[serde(default)]
    pub in_editable: bool,
}

impl SelectionChange {
    pub fn new(text: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            text: text.into(),
            start_offset,
            end_offset,
            in_editable: false,
        }
    }
}
