//! Gesture pipeline state machine.
//!
//! Sequences the steps between "a gesture was recognized" and "the panel
//! shows a resolved search term":
//!
//! ```text
//! TapRecognized ──► [WaitingForTapOnTapSelection] ──► TapGestureCommit
//!                                                          │
//! LongPressRecognized ──► GatheringSurroundings ◄──────────┘
//!                              │            │
//!                   ShowingLongPress   DecidingSuppression ──► StartShowingTapUi
//!                                                                   │
//!                              ShowingTapSearch ◄── [Resolving] ◄── ShowFullTapUi
//! ```
//!
//! The machine owns no collaborators. Work for each state is delegated to a
//! [`StateHandler`], which reports back synchronously or hands out a
//! [`WorkTicket`] and completes later.

mod machine;
mod state;

pub use machine::{GestureStateMachine, StateHandler, WorkStatus, WorkTicket};
pub use state::{InternalState, StateChangeReason};
