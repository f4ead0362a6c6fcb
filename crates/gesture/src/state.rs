//! Pipeline states and reasons for leaving them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InternalState {
    /// Before initialization and after teardown.
    Undefined,
    Idle,
    LongPressRecognized,
    ShowingLongPress,
    SelectionClearedRecognized,
    WaitingForTapNearPrevious,
    TapRecognized,
    WaitingForTapOnTapSelection,
    TapGestureCommit,
    GatheringSurroundings,
    DecidingSuppression,
    StartShowingTapUi,
    ShowFullTapUi,
    Resolving,
    ShowingTapSearch,
}

impl InternalState {
    /// States a new gesture sequence may be entered at.
    pub fn is_start_state(&self) -> bool {
        matches!(
            self,
            InternalState::Undefined
                | InternalState::Idle
                | InternalState::LongPressRecognized
                | InternalState::TapRecognized
                | InternalState::SelectionClearedRecognized
        )
    }

    /// States with no automatic successor.
    pub fn is_resting(&self) -> bool {
        matches!(
            self,
            InternalState::Undefined
                | InternalState::Idle
                | InternalState::ShowingLongPress
                | InternalState::ShowingTapSearch
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            InternalState::Undefined => "undefined",
            InternalState::Idle => "idle",
            InternalState::LongPressRecognized => "long_press_recognized",
            InternalState::ShowingLongPress => "showing_long_press",
            InternalState::SelectionClearedRecognized => "selection_cleared_recognized",
            InternalState::WaitingForTapNearPrevious => "waiting_for_tap_near_previous",
            InternalState::TapRecognized => "tap_recognized",
            InternalState::WaitingForTapOnTapSelection => "waiting_for_tap_on_tap_selection",
            InternalState::TapGestureCommit => "tap_gesture_commit",
            InternalState::GatheringSurroundings => "gathering_surroundings",
            InternalState::DecidingSuppression => "deciding_suppression",
            InternalState::StartShowingTapUi => "start_showing_tap_ui",
            InternalState::ShowFullTapUi => "show_full_tap_ui",
            InternalState::Resolving => "resolving",
            InternalState::ShowingTapSearch => "showing_tap_search",
        }
    }
}

impl std::fmt::Display for InternalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why the pipeline moved, most importantly why it went back to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateChangeReason {
    Reset,
    BasePageTap,
    BasePageScroll,
    SelectionCleared,
    InvalidSelection,
    TapSuppressed,
    NoBaseContent,
    Teardown,
    Unknown,
}

impl StateChangeReason {
    pub fn label(&self) -> &'static str {
        match self {
            StateChangeReason::Reset => "reset",
            StateChangeReason::BasePageTap => "base_page_tap",
            StateChangeReason::BasePageScroll => "base_page_scroll",
            StateChangeReason::SelectionCleared => "selection_cleared",
            StateChangeReason::InvalidSelection => "invalid_selection",
            StateChangeReason::TapSuppressed => "tap_suppressed",
            StateChangeReason::NoBaseContent => "no_base_content",
            StateChangeReason::Teardown => "teardown",
            StateChangeReason::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StateChangeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
