//! Selection tracking and gesture classification.

use crate::event::{GestureEvent, GestureKind, SelectionChange, TapMetadata};
use crate::snapshot::{SelectionSnapshot, SelectionType, TapPoint, TapRecord};
use tapsearch_context::check_selection;

/// What the caller should do after the tracker handled a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionNotice {
    /// A tap the page did not consume; start the tap pipeline.
    TapRecognized,
    /// A tap that must not start the pipeline (editable field, long-press
    /// selection showing, no tap recorded).
    InvalidTap,
    /// The selection established for a recognized tap.
    TapSelectionEstablished,
    /// Selection handles are showing over a selection; start the long-press pipeline.
    LongPressSelection,
    /// An existing long-press selection was changed (e.g., handles dragged).
    SelectionModified,
    /// The selection went away.
    SelectionCleared,
    /// A scroll began while a tap selection was showing.
    ScrollDismiss,
    /// Nothing to act on.
    Ignored,
}

/// Owns the current selection and classifies platform notifications.
///
/// All mutation goes through `handle_selection_changed`,
/// `handle_selection_event`, `handle_show_unhandled_tap_ui_if_needed` and
/// `clear_selection`. The tap history is written with `record_tap` once
/// suppression for a tap has been decided.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    snapshot: SelectionSnapshot,
    /// Tap seen by the gesture detector, not yet confirmed as unhandled.
    pending_tap: Option<TapPoint>,
    /// Tap confirmed for the current gesture sequence.
    current_tap: Option<TapPoint>,
    tap_metadata: TapMetadata,
    /// A tap was recognized and its selection has not arrived yet.
    was_tap_gesture_detected: bool,
    are_selection_handles_shown: bool,
    /// Handles are up but the selected text has not arrived yet.
    awaiting_long_press_text: bool,
    /// A tap selection was showing when it was last cleared.
    tap_selection_was_cleared: bool,
    previous_tap_selection_visible: bool,
    last_scroll_time_nanos: Option<u64>,
    /// Survives `clear_selection`; dropped on long-press and `forget_tap`.
    last_tap: Option<TapRecord>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &SelectionSnapshot {
        &self.snapshot
    }

    pub fn selection_type(&self) -> SelectionType {
        self.snapshot.selection_type
    }

    pub fn selected_text(&self) -> &str {
        &self.snapshot.text
    }

    pub fn last_scroll_time_nanos(&self) -> Option<u64> {
        self.last_scroll_time_nanos
    }

    /// The tap that started the current sequence, if it was a tap.
    pub fn current_tap(&self) -> Option<TapPoint> {
        self.current_tap
    }

    pub fn tap_metadata(&self) -> TapMetadata {
        self.tap_metadata
    }

    /// Whether a tap selection was on screen when the current tap arrived.
    pub fn previous_tap_selection_visible(&self) -> bool {
        self.previous_tap_selection_visible
    }

    pub fn are_selection_handles_shown(&self) -> bool {
        self.are_selection_handles_shown
    }

    /// Handles are shown and the long-press text is still on its way.
    pub fn is_awaiting_long_press_text(&self) -> bool {
        self.awaiting_long_press_text
    }

    /// The last tap that went through suppression.
    pub fn last_tap(&self) -> Option<TapRecord> {
        self.last_tap
    }

    /// Replace the tap history with `record`.
    pub fn record_tap(&mut self, record: TapRecord) {
        self.last_tap = Some(record);
    }

    pub fn forget_tap(&mut self) {
        self.last_tap = None;
    }

    /// Handle a raw gesture notification.
    pub fn handle_selection_event(&mut self, event: &GestureEvent) -> SelectionNotice {
        tracing::trace!(kind = %event.kind, ts = event.timestamp_nanos, "selection event");

        match event.kind {
            GestureKind::Tap => {
                self.pending_tap = Some(TapPoint {
                    position: event.position,
                    timestamp_nanos: event.timestamp_nanos,
                });
                SelectionNotice::Ignored
            }
            GestureKind::LongPress => {
                self.last_tap = None;
                self.pending_tap = None;
                self.was_tap_gesture_detected = false;
                self.snapshot.selection_type = SelectionType::LongPress;
                self.snapshot.position = event.position;
                SelectionNotice::Ignored
            }
            GestureKind::SelectionHandlesShown => {
                self.are_selection_handles_shown = true;
                self.last_tap = None;
                self.was_tap_gesture_detected = false;
                self.pending_tap = None;
                self.current_tap = None;
                self.snapshot.selection_type = SelectionType::LongPress;
                self.snapshot.position = event.position;

                if self.snapshot.is_empty() {
                    self.awaiting_long_press_text = true;
                    SelectionNotice::Ignored
                } else {
                    self.awaiting_long_press_text = false;
                    SelectionNotice::LongPressSelection
                }
            }
            GestureKind::SelectionCleared => {
                self.tap_selection_was_cleared = self.snapshot.selection_type == SelectionType::Tap
                    && !self.snapshot.is_empty();
                self.are_selection_handles_shown = false;
                self.awaiting_long_press_text = false;
                self.snapshot = SelectionSnapshot::default();
                SelectionNotice::SelectionCleared
            }
            GestureKind::ScrollStart => {
                self.last_scroll_time_nanos = Some(event.timestamp_nanos);
                if self.snapshot.selection_type == SelectionType::Tap && !self.snapshot.is_empty() {
                    self.snapshot = SelectionSnapshot::default();
                    self.current_tap = None;
                    SelectionNotice::ScrollDismiss
                } else {
                    SelectionNotice::Ignored
                }
            }
            GestureKind::ScrollEnd => {
                self.last_scroll_time_nanos = Some(event.timestamp_nanos);
                SelectionNotice::Ignored
            }
        }
    }

    /// Handle the platform reporting that the last tap was not consumed by
    /// the page.
    pub fn handle_show_unhandled_tap_ui_if_needed(
        &mut self,
        metadata: TapMetadata,
    ) -> SelectionNotice {
        self.was_tap_gesture_detected = false;

        let Some(tap) = self.pending_tap.take() else {
            tracing::warn!("unhandled tap reported without a preceding tap event");
            return SelectionNotice::InvalidTap;
        };

        if self.are_selection_handles_shown {
            tracing::debug!("tap while selection handles are shown");
            return SelectionNotice::InvalidTap;
        }

        if metadata.in_editable {
            tracing::debug!("tap on editable field");
            return SelectionNotice::InvalidTap;
        }

        self.previous_tap_selection_visible = self.tap_selection_was_cleared
            || (self.snapshot.selection_type == SelectionType::Tap && !self.snapshot.is_empty());
        self.tap_selection_was_cleared = false;

        self.was_tap_gesture_detected = true;
        self.current_tap = Some(tap);
        self.tap_metadata = metadata;
        self.snapshot = SelectionSnapshot {
            selection_type: SelectionType::Tap,
            position: tap.position,
            ..SelectionSnapshot::default()
        };

        tracing::debug!(
            x = tap.position.x,
            y = tap.position.y,
            font_size = metadata.font_size_dips,
            previous_visible = self.previous_tap_selection_visible,
            "tap recognized"
        );
        SelectionNotice::TapRecognized
    }

    /// Handle a change of the selected text.
    pub fn handle_selection_changed(&mut self, change: SelectionChange) -> SelectionNotice {
        if change.text.is_empty() {
            self.snapshot.text.clear();
            self.snapshot.valid = false;
            return SelectionNotice::Ignored;
        }

        let check = check_selection(&change.text, change.in_editable);
        if !check.is_valid() {
            tracing::debug!(reason = %check, "selection rejected");
        }

        self.snapshot.text = change.text;
        self.snapshot.start_offset = change.start_offset;
        self.snapshot.end_offset = change.end_offset;
        self.snapshot.valid = check.is_valid();

        if self.was_tap_gesture_detected {
            self.was_tap_gesture_detected = false;
            self.snapshot.selection_type = SelectionType::Tap;
            return SelectionNotice::TapSelectionEstablished;
        }

        match self.snapshot.selection_type {
            SelectionType::Tap => SelectionNotice::TapSelectionEstablished,
            SelectionType::LongPress if self.awaiting_long_press_text => {
                self.awaiting_long_press_text = false;
                SelectionNotice::LongPressSelection
            }
            SelectionType::LongPress if self.are_selection_handles_shown => {
                SelectionNotice::SelectionModified
            }
            _ => SelectionNotice::Ignored,
        }
    }

    /// Forget the current selection. Scroll and tap history are kept.
    pub fn clear_selection(&mut self) {
        self.snapshot = SelectionSnapshot::default();
        self.pending_tap = None;
        self.current_tap = None;
        self.tap_metadata = TapMetadata::default();
        self.was_tap_gesture_detected = false;
        self.are_selection_handles_shown = false;
        self.awaiting_long_press_text = false;
        self.tap_selection_was_cleared = false;
        self.previous_tap_selection_visible = false;
    }
}
