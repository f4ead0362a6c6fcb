//! The gesture state machine.

use crate::state::{InternalState, StateChangeReason};

/// Identifies one visit of a state.
///
/// Async work carries the ticket it was started with. A completion whose
/// ticket is no longer current belongs to an abandoned visit and is dropped,
/// even if the machine has since come back to the same state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkTicket {
    state: InternalState,
    epoch: u64,
}

impl WorkTicket {
    pub fn state(&self) -> InternalState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// What a handler did with the work for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkStatus {
    /// Done; advance immediately.
    Finished,
    /// Outstanding; the caller will report completion with the ticket.
    Pending,
    /// Cannot continue; the sequence resets with this reason.
    Failed(StateChangeReason),
}

/// Does the work for each state on behalf of the machine.
pub trait StateHandler {
    /// Start the work for `ticket.state()`.
    fn start_working_on(&mut self, ticket: WorkTicket) -> WorkStatus;

    /// Whether `ShowFullTapUi` should go through `Resolving`.
    fn should_resolve(&self) -> bool;

    /// The pipeline went back to idle: release per-sequence resources.
    fn on_idle(&mut self, reason: StateChangeReason);

    /// The pipeline was torn down.
    fn on_teardown(&mut self) {
        self.on_idle(StateChangeReason::Teardown);
    }

    fn on_state_changed(
        &mut self,
        _from: InternalState,
        _to: InternalState,
        _reason: StateChangeReason,
    ) {
    }
}

enum Successor {
    State(InternalState),
    Reset(StateChangeReason),
    Rest,
}

/// Sequences the activation pipeline.
///
/// Exactly one state is current. Transitions happen only through
/// [`reset`](Self::reset), [`enter`](Self::enter) and
/// [`notify_finished_work_on`](Self::notify_finished_work_on); states whose
/// work finishes synchronously are passed through in a loop.
#[derive(Debug)]
pub struct GestureStateMachine {
    current: InternalState,
    previous: InternalState,
    epoch: u64,
    outstanding: Option<WorkTicket>,
}

impl Default for GestureStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureStateMachine {
    pub fn new() -> Self {
        Self {
            current: InternalState::Idle,
            previous: InternalState::Undefined,
            epoch: 0,
            outstanding: None,
        }
    }

    pub fn current(&self) -> InternalState {
        self.current
    }

    pub fn previous(&self) -> InternalState {
        self.previous
    }

    /// Ticket for the current visit.
    pub fn current_ticket(&self) -> WorkTicket {
        WorkTicket {
            state: self.current,
            epoch: self.epoch,
        }
    }

    /// Ticket of work that is started and not yet finished, if any.
    pub fn outstanding(&self) -> Option<WorkTicket> {
        self.outstanding
    }

    pub fn is_still_working_on(&self, state: InternalState) -> bool {
        self.current == state
    }

    pub fn is_current(&self, ticket: WorkTicket) -> bool {
        ticket == self.current_ticket()
    }

    /// Go back to idle, running the idle hook. No-op when already idle.
    pub fn reset(&mut self, reason: StateChangeReason, handler: &mut dyn StateHandler) {
        if self.current == InternalState::Idle {
            tracing::trace!(%reason, "reset while idle");
            return;
        }
        self.transition_to(InternalState::Idle, reason, handler);
    }

    /// Start a new sequence at `state`.
    ///
    /// Entering a start state while a sequence is running abandons the
    /// running sequence's outstanding work without going through idle.
    pub fn enter(&mut self, state: InternalState, handler: &mut dyn StateHandler) {
        debug_assert!(state.is_start_state(), "{state} is not a start state");
        match state {
            InternalState::Idle => self.reset(StateChangeReason::Reset, handler),
            InternalState::Undefined => {
                self.transition_to(InternalState::Undefined, StateChangeReason::Teardown, handler)
            }
            _ if state.is_start_state() => {
                self.transition_to(state, StateChangeReason::Unknown, handler)
            }
            _ => tracing::warn!(%state, "ignoring request to enter a non-start state"),
        }
    }

    /// Record that work for the current state is outstanding.
    ///
    /// Returns `None` if `state` is not current.
    pub fn notify_starting_work_on(&mut self, state: InternalState) -> Option<WorkTicket> {
        if self.current != state {
            tracing::debug!(%state, current = %self.current, "start of work for a state that is not current");
            return None;
        }
        let ticket = self.current_ticket();
        self.outstanding = Some(ticket);
        Some(ticket)
    }

    /// Report that the work for `state` is done and advance.
    ///
    /// Returns false when the completion was dropped.
    pub fn notify_finished_work_on(
        &mut self,
        state: InternalState,
        handler: &mut dyn StateHandler,
    ) -> bool {
        if self.current != state {
            tracing::debug!(%state, current = %self.current, "dropping out-of-sequence completion");
            return false;
        }
        debug_assert!(!state.is_resting(), "finished work on resting state {state}");
        if state.is_resting() {
            tracing::warn!(%state, "ignoring finished work on a resting state");
            return false;
        }
        self.outstanding = None;
        self.advance(handler);
        true
    }

    /// Like [`notify_finished_work_on`](Self::notify_finished_work_on) but
    /// also rejects completions from an earlier visit of the same state.
    pub fn notify_finished(&mut self, ticket: WorkTicket, handler: &mut dyn StateHandler) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                state = %ticket.state,
                epoch = ticket.epoch,
                current = %self.current,
                current_epoch = self.epoch,
                "dropping stale completion"
            );
            return false;
        }
        self.notify_finished_work_on(ticket.state, handler)
    }

    fn successor(&self, handler: &dyn StateHandler) -> Successor {
        use InternalState::*;

        match self.current {
            LongPressRecognized => Successor::State(GatheringSurroundings),
            SelectionClearedRecognized if self.previous != Idle => {
                Successor::State(WaitingForTapNearPrevious)
            }
            SelectionClearedRecognized | WaitingForTapNearPrevious => {
                Successor::Reset(StateChangeReason::SelectionCleared)
            }
            TapRecognized if self.previous != Idle => Successor::State(WaitingForTapOnTapSelection),
            TapRecognized | WaitingForTapOnTapSelection => Successor::State(TapGestureCommit),
            TapGestureCommit => Successor::State(GatheringSurroundings),
            GatheringSurroundings if self.previous == LongPressRecognized => {
                Successor::State(ShowingLongPress)
            }
            GatheringSurroundings => Successor::State(DecidingSuppression),
            DecidingSuppression => Successor::State(StartShowingTapUi),
            StartShowingTapUi => Successor::State(ShowFullTapUi),
            ShowFullTapUi if handler.should_resolve() => Successor::State(Resolving),
            ShowFullTapUi | Resolving => Successor::State(ShowingTapSearch),
            Undefined | Idle | ShowingLongPress | ShowingTapSearch => Successor::Rest,
        }
    }

    fn advance(&mut self, handler: &mut dyn StateHandler) {
        match self.successor(handler) {
            Successor::State(next) => self.transition_to(next, StateChangeReason::Unknown, handler),
            Successor::Reset(reason) => self.transition_to(InternalState::Idle, reason, handler),
            Successor::Rest => {}
        }
    }

    fn transition_to(
        &mut self,
        state: InternalState,
        reason: StateChangeReason,
        handler: &mut dyn StateHandler,
    ) {
        let mut next = state;
        let mut reason = reason;
        loop {
            let from = self.current;
            self.previous = from;
            self.current = next;
            self.epoch += 1;
            self.outstanding = None;

            tracing::debug!(
                from = %from,
                to = %next,
                %reason,
                epoch = self.epoch,
                "state transition"
            );
            handler.on_state_changed(from, next, reason);

            match next {
                InternalState::Idle => {
                    handler.on_idle(reason);
                    return;
                }
                InternalState::Undefined => {
                    handler.on_teardown();
                    return;
                }
                _ => {}
            }

            let ticket = self.current_ticket();
            match handler.start_working_on(ticket) {
                WorkStatus::Finished => match self.successor(handler) {
                    Successor::State(state) => {
                        next = state;
                        reason = StateChangeReason::Unknown;
                    }
                    Successor::Reset(r) => {
                        next = InternalState::Idle;
                        reason = r;
                    }
                    Successor::Rest => return,
                },
                WorkStatus::Pending => {
                    self.outstanding = Some(ticket);
                    return;
                }
                WorkStatus::Failed(r) => {
                    tracing::debug!(state = %next, reason = %r, "state work failed");
                    next = InternalState::Idle;
                    reason = r;
                }
            }
        }
    }
}
