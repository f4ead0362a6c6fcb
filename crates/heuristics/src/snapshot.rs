//! Inputs heuristics are evaluated against.

use tapsearch_context::Context;
use tapsearch_selection::{TapMetadata, TapPoint, TapRecord};

/// Everything a heuristic may look at for one tap.
///
/// Frozen at decision time; heuristics never see later updates.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicSnapshot<'a> {
    /// Word analysis for the tap. `None` when surrounding text was not
    /// requested before deciding.
    pub context: Option<&'a Context>,

    pub tap: TapPoint,

    pub metadata: TapMetadata,

    /// The tap before this one, if it is still remembered.
    pub previous_tap: Option<TapRecord>,

    /// Whether the previous tap left a visible selection.
    pub previous_tap_selection_visible: bool,

    pub last_scroll_time_nanos: Option<u64>,

    /// Pixels to device-independent units.
    pub px_to_dp: f32,
}

impl<'a> HeuristicSnapshot<'a> {
    pub fn new(tap: TapPoint) -> Self {
        Self {
            context: None,
            tap,
            metadata: TapMetadata::default(),
            previous_tap: None,
            previous_tap_selection_visible: false,
            last_scroll_time_nanos: None,
            px_to_dp: 1.0,
        }
    }

    pub fn with_context(mut self, context: &'a Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_metadata(mut self, metadata: TapMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_previous_tap(mut self, previous: TapRecord, selection_visible: bool) -> Self {
        self.previous_tap = Some(previous);
        self.previous_tap_selection_visible = selection_visible;
        self
    }

    pub fn with_last_scroll(mut self, timestamp_nanos: u64) -> Self {
        self.last_scroll_time_nanos = Some(timestamp_nanos);
        self
    }

    pub fn with_px_to_dp(mut self, px_to_dp: f32) -> Self {
        self.px_to_dp = px_to_dp;
        self
    }

    /// Distance from the previous tap in device-independent units.
    pub fn distance_from_previous_dp(&self) -> Option<f32> {
        let previous = self.previous_tap?;
        Some(previous.position().distance_to(&self.tap.position) * self.px_to_dp)
    }

    /// Milliseconds since the previous tap. `None` if there is none or the
    /// clock went backwards.
    pub fn millis_since_previous_tap(&self) -> Option<u64> {
        let previous = self.previous_tap?;
        self.tap
            .timestamp_nanos
            .checked_sub(previous.tap_time_nanos())
            .map(|nanos| nanos / 1_000_000)
    }

    pub fn millis_since_last_scroll(&self) -> Option<u64> {
        self.tap
            .timestamp_nanos
            .checked_sub(self.last_scroll_time_nanos?)
            .map(|nanos| nanos / 1_000_000)
    }
}
