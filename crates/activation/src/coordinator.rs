//! The activation coordinator.
//!
//! Owns the state machine and everything one gesture sequence touches. All
//! inputs are synchronous method calls; async work is queued as
//! [`PendingWork`] and its results come back through the `on_*` methods
//! with the [`WorkTicket`] they were issued for.

use crate::config::ActivationConfig;
use crate::panel::{PanelDriver, SearchTermDisplay};
use crate::resolver::{ResolveRequest, ResolvedSearchTerm};
use std::sync::Arc;
use std::time::Duration;
use tapsearch_context::{Context, SurroundingText, SurroundingTextError, SurroundingTextProvider};
use tapsearch_events::{
    event_names, now_ms, publish, EventBusRef, SearchTermEvent, StaleResultEvent,
    StateChangedEvent, SuppressedEvent,
};
use tapsearch_gesture::{
    GestureStateMachine, InternalState, StateChangeReason, StateHandler, WorkStatus, WorkTicket,
};
use tapsearch_heuristics::{
    outcome_names, HeuristicKind, HeuristicSet, HeuristicSnapshot, RankerVerdict, RankingPredictor,
    SuppressionDecision, SuppressionReport,
};
use tapsearch_selection::{
    GestureEvent, SelectionChange, SelectionNotice, SelectionTracker, SelectionType, TapMetadata,
    TapRecord,
};
use uuid::Uuid;

/// Collaborators the coordinator calls synchronously.
#[derive(Clone)]
pub struct Collaborators {
    pub panel: Arc<dyn PanelDriver>,
    pub surrounding_text: Arc<dyn SurroundingTextProvider>,
    pub ranker: Option<Arc<dyn RankingPredictor>>,
    pub events: EventBusRef,
}

/// Async work the driver must run and report back.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingWork {
    /// Call `SurroundingTextProvider::request`, then `on_surrounding_text`.
    RequestSurroundingText { ticket: WorkTicket },
    /// Call `RankingPredictor::run_prediction`, then `on_ranking_verdict`.
    RunPrediction { ticket: WorkTicket },
    /// Call `SearchTermResolver::resolve`, then `on_resolved`.
    Resolve {
        ticket: WorkTicket,
        request: ResolveRequest,
    },
    /// Sleep for `delay`, then `on_timer_elapsed`.
    Timer { ticket: WorkTicket, delay: Duration },
}

impl PendingWork {
    pub fn ticket(&self) -> WorkTicket {
        match self {
            PendingWork::RequestSurroundingText { ticket }
            | PendingWork::RunPrediction { ticket }
            | PendingWork::Resolve { ticket, .. }
            | PendingWork::Timer { ticket, .. } => *ticket,
        }
    }
}

/// Per-state work, split from the machine so both can be borrowed at once.
struct Pipeline {
    config: Arc<ActivationConfig>,
    collaborators: Collaborators,
    heuristics: HeuristicSet,
    tracker: SelectionTracker,
    context: Option<Context>,
    sequence_id: Option<Uuid>,
    pending: Vec<PendingWork>,
    /// Heuristic report for a tap waiting on the ranker.
    awaiting_ranking: Option<SuppressionReport>,
    last_decision: Option<SuppressionDecision>,
    /// Features went to the ranker and no outcome was logged yet.
    ranker_has_features: bool,
}

impl Pipeline {
    fn ranker(&self) -> Option<&Arc<dyn RankingPredictor>> {
        if self.config.ranking_enabled {
            self.collaborators.ranker.as_ref()
        } else {
            None
        }
    }

    fn schedule(&mut self, work: PendingWork) -> WorkStatus {
        self.pending.push(work);
        WorkStatus::Pending
    }

    fn timer(&mut self, ticket: WorkTicket, delay: Duration) -> WorkStatus {
        self.schedule(PendingWork::Timer { ticket, delay })
    }

    fn show_search_term(&self, display: &SearchTermDisplay) {
        self.collaborators.panel.set_search_term(display);
        publish(
            self.collaborators.events.as_ref(),
            event_names::SEARCH_TERM,
            &SearchTermEvent {
                sequence_id: self.sequence_id,
                search_term: display.search_term.clone(),
                display_text: display.display_text.clone(),
                is_literal: display.is_literal,
                ts_ms: now_ms(),
            },
        );
    }

    fn publish_suppressed(&self, heuristics: Vec<HeuristicKind>, verdict: Option<RankerVerdict>) {
        publish(
            self.collaborators.events.as_ref(),
            event_names::SUPPRESSED,
            &SuppressedEvent {
                sequence_id: self.sequence_id,
                heuristics,
                ranker_verdict: verdict,
                ts_ms: now_ms(),
            },
        );
    }

    /// Report the outcome of the last ranked tap and clear the ranker.
    fn finish_ranking(&mut self) {
        if !self.ranker_has_features {
            return;
        }
        self.ranker_has_features = false;
        if let Some(ranker) = self.collaborators.ranker.as_ref() {
            let panel = &self.collaborators.panel;
            let opened = panel.is_showing() && !panel.is_peeking();
            ranker.log_outcome(outcome_names::WAS_PANEL_OPENED, opened.into());
            ranker.reset();
        }
    }

    fn start_sequence(&mut self) {
        let id = Uuid::new_v4();
        tracing::debug!(sequence_id = %id, "gesture sequence started");
        self.sequence_id = Some(id);
        self.context = None;
        self.awaiting_ranking = None;
    }

    fn gather_surroundings(&mut self, ticket: WorkTicket) -> WorkStatus {
        if !self.collaborators.surrounding_text.is_available() {
            tracing::debug!("surrounding text unavailable");
            return WorkStatus::Failed(StateChangeReason::NoBaseContent);
        }
        let sequence_id = *self.sequence_id.get_or_insert_with(Uuid::new_v4);
        self.context = Some(Context::new(sequence_id));
        self.schedule(PendingWork::RequestSurroundingText { ticket })
    }

    fn decide_suppression(&mut self, ticket: WorkTicket) -> WorkStatus {
        let Some(tap) = self.tracker.current_tap() else {
            return WorkStatus::Failed(StateChangeReason::InvalidSelection);
        };
        self.finish_ranking();

        let mut snapshot = HeuristicSnapshot::new(tap)
            .with_metadata(self.tracker.tap_metadata())
            .with_px_to_dp(self.config.px_to_dp);
        if let Some(context) = self.context.as_ref() {
            snapshot = snapshot.with_context(context);
        }
        if let Some(previous) = self.tracker.last_tap() {
            snapshot = snapshot.with_previous_tap(previous, self.tracker.previous_tap_selection_visible());
        }
        if let Some(scroll) = self.tracker.last_scroll_time_nanos() {
            snapshot = snapshot.with_last_scroll(scroll);
        }
        let report = self.heuristics.evaluate(&snapshot);

        if let Some(ranker) = self.ranker() {
            for (name, value) in report.features().iter() {
                ranker.log_feature(name, value);
            }
            self.ranker_has_features = true;
        }

        if report.needs_ranking() && self.ranker().is_some() {
            self.awaiting_ranking = Some(report);
            return self.schedule(PendingWork::RunPrediction { ticket });
        }

        let decision = report.decide(None);
        self.conclude_suppression(decision, None)
    }

    /// Record the tap and either let it through or fail the state.
    fn conclude_suppression(
        &mut self,
        decision: SuppressionDecision,
        verdict: Option<RankerVerdict>,
    ) -> WorkStatus {
        if let Some(tap) = self.tracker.current_tap() {
            self.tracker
                .record_tap(TapRecord::new(tap, decision.was_suppressed_by_ranking()));
        }
        tracing::debug!(
            sequence_id = ?self.sequence_id,
            decision = decision.label(),
            verdict = ?verdict,
            "suppression decided"
        );

        let status = match &decision {
            SuppressionDecision::SuppressedByHeuristics(kinds) => {
                self.publish_suppressed(kinds.clone(), verdict);
                WorkStatus::Failed(StateChangeReason::TapSuppressed)
            }
            SuppressionDecision::SuppressedByRanking => {
                self.publish_suppressed(Vec::new(), verdict);
                WorkStatus::Failed(StateChangeReason::TapSuppressed)
            }
            SuppressionDecision::Show | SuppressionDecision::ShowOverridingRanking => {
                WorkStatus::Finished
            }
        };
        self.last_decision = Some(decision);
        status
    }

    fn resolve_request(&self) -> ResolveRequest {
        match self.context.as_ref() {
            Some(context) => ResolveRequest {
                selected_text: context.selected_text(),
                surrounding_text: context.surrounding_text().to_string(),
                selection_start: context.selection_start(),
                selection_end: context.selection_end(),
                encoding: context.encoding().to_string(),
                content_language: context.detected_language().map(str::to_string),
            },
            None => ResolveRequest {
                selected_text: self.tracker.selected_text().to_string(),
                ..ResolveRequest::default()
            },
        }
    }
}

impl StateHandler for Pipeline {
    fn start_working_on(&mut self, ticket: WorkTicket) -> WorkStatus {
        use InternalState::*;

        match ticket.state() {
            TapRecognized => {
                self.start_sequence();
                WorkStatus::Finished
            }
            LongPressRecognized => {
                self.start_sequence();
                if self.tracker.snapshot().valid {
                    WorkStatus::Finished
                } else {
                    WorkStatus::Failed(StateChangeReason::InvalidSelection)
                }
            }
            SelectionClearedRecognized => WorkStatus::Finished,
            WaitingForTapNearPrevious => {
                let window = self.config.timing.tap_near_previous_window();
                self.timer(ticket, window)
            }
            WaitingForTapOnTapSelection => {
                let window = self.config.timing.tap_on_tap_selection_window();
                self.timer(ticket, window)
            }
            TapGestureCommit => {
                // Handles came up first; the arriving text turns this into a long-press.
                if self.tracker.is_awaiting_long_press_text() {
                    tracing::debug!("tap commit parked until long-press text arrives");
                    return WorkStatus::Pending;
                }
                let is_tap = self.tracker.selection_type() == SelectionType::Tap;
                if is_tap && self.tracker.current_tap().is_some() {
                    WorkStatus::Finished
                } else {
                    WorkStatus::Failed(StateChangeReason::InvalidSelection)
                }
            }
            GatheringSurroundings => self.gather_surroundings(ticket),
            DecidingSuppression => self.decide_suppression(ticket),
            StartShowingTapUi => match self.config.timing.wait_after_tap_delay() {
                Some(delay) => self.timer(ticket, delay),
                None => WorkStatus::Finished,
            },
            ShowFullTapUi => {
                self.collaborators.panel.show_tap_ui();
                let display = SearchTermDisplay::literal(self.tracker.selected_text());
                self.show_search_term(&display);
                WorkStatus::Finished
            }
            Resolving => {
                let request = self.resolve_request();
                self.schedule(PendingWork::Resolve { ticket, request })
            }
            ShowingLongPress => {
                self.collaborators.panel.show_long_press();
                let display = SearchTermDisplay::literal(self.tracker.selected_text());
                self.show_search_term(&display);
                WorkStatus::Finished
            }
            ShowingTapSearch => WorkStatus::Finished,
            Idle | Undefined => WorkStatus::Finished,
        }
    }

    fn should_resolve(&self) -> bool {
        self.config.resolve_enabled
    }

    fn on_idle(&mut self, reason: StateChangeReason) {
        self.finish_ranking();
        let panel = &self.collaborators.panel;
        if panel.is_showing() {
            panel.hide(reason);
        }
        tracing::debug!(sequence_id = ?self.sequence_id, %reason, "sequence ended");
        self.tracker.clear_selection();
        self.context = None;
        self.sequence_id = None;
        self.awaiting_ranking = None;
        self.pending.clear();
    }

    fn on_teardown(&mut self) {
        self.on_idle(StateChangeReason::Teardown);
        self.tracker.forget_tap();
    }

    fn on_state_changed(
        &mut self,
        from: InternalState,
        to: InternalState,
        reason: StateChangeReason,
    ) {
        publish(
            self.collaborators.events.as_ref(),
            event_names::STATE_CHANGED,
            &StateChangedEvent {
                sequence_id: self.sequence_id,
                from,
                to,
                reason,
                ts_ms: now_ms(),
            },
        );
    }
}

/// Drives one gesture sequence at a time through the state machine.
pub struct ActivationCoordinator {
    machine: GestureStateMachine,
    pipeline: Pipeline,
}

impl ActivationCoordinator {
    pub fn new(config: Arc<ActivationConfig>, collaborators: Collaborators) -> Self {
        let heuristics = HeuristicSet::from_config(&config.heuristics);
        Self::with_heuristics(config, collaborators, heuristics)
    }

    /// Use a custom heuristic set instead of the built-in one.
    pub fn with_heuristics(
        config: Arc<ActivationConfig>,
        collaborators: Collaborators,
        heuristics: HeuristicSet,
    ) -> Self {
        Self {
            machine: GestureStateMachine::new(),
            pipeline: Pipeline {
                config,
                collaborators,
                heuristics,
                tracker: SelectionTracker::new(),
                context: None,
                sequence_id: None,
                pending: Vec::new(),
                awaiting_ranking: None,
                last_decision: None,
                ranker_has_features: false,
            },
        }
    }

    pub fn state(&self) -> InternalState {
        self.machine.current()
    }

    pub fn previous_state(&self) -> InternalState {
        self.machine.previous()
    }

    pub fn is_still_working_on(&self, state: InternalState) -> bool {
        self.machine.is_still_working_on(state)
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.pipeline.tracker
    }

    pub fn context(&self) -> Option<&Context> {
        self.pipeline.context.as_ref()
    }

    pub fn sequence_id(&self) -> Option<Uuid> {
        self.pipeline.sequence_id
    }

    pub fn config(&self) -> &ActivationConfig {
        &self.pipeline.config
    }

    /// The suppression decision for the most recent tap.
    pub fn last_decision(&self) -> Option<&SuppressionDecision> {
        self.pipeline.last_decision.as_ref()
    }

    /// Drain async work queued since the last call.
    pub fn take_pending_work(&mut self) -> Vec<PendingWork> {
        std::mem::take(&mut self.pipeline.pending)
    }

    pub fn reset(&mut self, reason: StateChangeReason) {
        self.machine.reset(reason, &mut self.pipeline);
    }

    /// Stop the pipeline and forget all tap history.
    pub fn teardown(&mut self) {
        self.machine.enter(InternalState::Undefined, &mut self.pipeline);
    }

    /// A raw gesture from the platform.
    pub fn handle_gesture(&mut self, event: &GestureEvent) {
        match self.pipeline.tracker.handle_selection_event(event) {
            SelectionNotice::ScrollDismiss => self.reset(StateChangeReason::BasePageScroll),
            SelectionNotice::SelectionCleared => {
                // Only a running sequence cares; it may be waiting for a nearby tap.
                if !matches!(self.state(), InternalState::Idle | InternalState::Undefined) {
                    self.enter(InternalState::SelectionClearedRecognized);
                }
            }
            SelectionNotice::LongPressSelection => self.enter(InternalState::LongPressRecognized),
            _ => {}
        }
    }

    /// The platform reports that the last tap was not consumed by the page.
    pub fn handle_unhandled_tap(&mut self, metadata: TapMetadata) {
        match self
            .pipeline
            .tracker
            .handle_show_unhandled_tap_ui_if_needed(metadata)
        {
            SelectionNotice::TapRecognized => self.enter(InternalState::TapRecognized),
            _ => self.reset(StateChangeReason::BasePageTap),
        }
    }

    /// The platform reports a new selection.
    pub fn handle_selection_changed(&mut self, change: SelectionChange) {
        match self.pipeline.tracker.handle_selection_changed(change) {
            SelectionNotice::LongPressSelection => self.enter(InternalState::LongPressRecognized),
            SelectionNotice::SelectionModified if self.state() == InternalState::ShowingLongPress => {
                let display = SearchTermDisplay::literal(self.pipeline.tracker.selected_text());
                self.pipeline.show_search_term(&display);
            }
            _ => {}
        }
    }

    fn enter(&mut self, state: InternalState) {
        self.machine.enter(state, &mut self.pipeline);
    }

    fn finish(&mut self, ticket: WorkTicket) {
        self.machine.notify_finished(ticket, &mut self.pipeline);
    }

    /// Whether a result for `ticket` may still be applied.
    fn accept(&self, ticket: WorkTicket, result: &str) -> bool {
        if self.machine.is_current(ticket) {
            return true;
        }
        tracing::debug!(
            result,
            issued_for = %ticket.state(),
            current = %self.machine.current(),
            "dropping stale result"
        );
        publish(
            self.pipeline.collaborators.events.as_ref(),
            event_names::STALE_RESULT,
            &StaleResultEvent {
                result: result.to_string(),
                issued_for: ticket.state(),
                current: self.machine.current(),
                ts_ms: now_ms(),
            },
        );
        false
    }

    pub fn on_surrounding_text(
        &mut self,
        ticket: WorkTicket,
        result: Result<SurroundingText, SurroundingTextError>,
    ) {
        if !self.accept(ticket, "surrounding_text") {
            return;
        }
        let surrounding = match result {
            Ok(surrounding) if !surrounding.is_degenerate() => surrounding,
            Ok(_) => {
                tracing::warn!("degenerate surrounding text");
                return self.reset(StateChangeReason::NoBaseContent);
            }
            Err(e) => {
                tracing::warn!(error = %e, "surrounding text request failed");
                return self.reset(StateChangeReason::NoBaseContent);
            }
        };

        let is_long_press = self.machine.previous() == InternalState::LongPressRecognized;
        let Some(context) = self.pipeline.context.as_mut() else {
            return self.reset(StateChangeReason::NoBaseContent);
        };
        context.set_surrounding_text(surrounding);

        if !is_long_press {
            let tap_offset = context.selection_start();
            context.analyze_tap(tap_offset);
            if !context.select_tapped_word() {
                tracing::debug!(tap_offset, "no word under tap");
                return self.reset(StateChangeReason::InvalidSelection);
            }
            let change = SelectionChange::new(
                context.selected_text(),
                context.selection_start(),
                context.selection_end(),
            );
            self.pipeline.tracker.handle_selection_changed(change);
            if !self.pipeline.tracker.snapshot().valid {
                return self.reset(StateChangeReason::InvalidSelection);
            }
        }
        self.finish(ticket);
    }

    pub fn on_ranking_verdict(&mut self, ticket: WorkTicket, verdict: RankerVerdict) {
        if !self.accept(ticket, "ranking_verdict") {
            return;
        }
        let Some(report) = self.pipeline.awaiting_ranking.take() else {
            tracing::warn!("ranking verdict without a pending report");
            return self.reset(StateChangeReason::Unknown);
        };
        let decision = report.decide(Some(verdict));
        match self.pipeline.conclude_suppression(decision, Some(verdict)) {
            WorkStatus::Failed(reason) => self.reset(reason),
            _ => self.finish(ticket),
        }
    }

    /// A prediction was requested but no ranker is there to run it.
    pub fn on_ranking_unavailable(&mut self, ticket: WorkTicket) {
        if self.accept(ticket, "ranking_unavailable") {
            tracing::warn!("prediction requested without a ranker");
            self.reset(StateChangeReason::Unknown);
        }
    }

    pub fn on_resolved(&mut self, ticket: WorkTicket, resolved: ResolvedSearchTerm) {
        if !self.accept(ticket, "resolve") {
            return;
        }

        let display = match resolved.failure() {
            Some(status) => {
                tracing::debug!(
                    status,
                    http_status = resolved.http_status,
                    "falling back to literal search"
                );
                SearchTermDisplay::literal(self.pipeline.tracker.selected_text()).with_status(status)
            }
            None => {
                self.apply_resolution(&resolved);
                resolved.to_display()
            }
        };
        self.pipeline.show_search_term(&display);
        self.finish(ticket);
    }

    /// Grow the selection and record the language the resolver reported.
    fn apply_resolution(&mut self, resolved: &ResolvedSearchTerm) {
        let Some(context) = self.pipeline.context.as_mut() else {
            return;
        };
        if let Some(language) = resolved.detected_language.as_deref() {
            context.set_detected_language(language);
        }
        let (start, end) = (resolved.selection_start_adjust, resolved.selection_end_adjust);
        if (start, end) != (0, 0) && context.adjust_selection(start, end) {
            let change = SelectionChange::new(
                context.selected_text(),
                context.selection_start(),
                context.selection_end(),
            );
            self.pipeline.tracker.handle_selection_changed(change);
        }
    }

    pub fn on_timer_elapsed(&mut self, ticket: WorkTicket) {
        if self.accept(ticket, "timer") {
            self.finish(ticket);
        }
    }
}

impl std::fmt::Debug for ActivationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationCoordinator")
            .field("state", &self.machine.current())
            .field("sequence_id", &self.pipeline.sequence_id)
            .field("pending", &self.pipeline.pending.len())
            .finish()
    }
}
