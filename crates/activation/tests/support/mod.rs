//! In-memory collaborators for activation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tapsearch_activation::{
    ActivationConfig, ActivationCoordinator, Collaborators, PanelDriver, PendingWork,
    ResolveRequest, ResolvedSearchTerm, SearchTermDisplay, SearchTermResolver,
};
use tapsearch_context::{SurroundingText, SurroundingTextError, SurroundingTextProvider};
use tapsearch_events::{event_names, InMemoryEventBus, StateChangedEvent};
use tapsearch_gesture::{InternalState, StateChangeReason, WorkTicket};
use tapsearch_heuristics::{FeatureValue, RankerVerdict, RankingPredictor};
use tapsearch_selection::{GestureEvent, GestureKind, Position, TapMetadata};

pub const MS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelCall {
    ShowLongPress,
    ShowTapUi,
    Hide(StateChangeReason),
    SetSearchTerm(SearchTermDisplay),
}

/// Records every mutating panel call.
#[derive(Default)]
pub struct RecordingPanel {
    calls: Mutex<Vec<PanelCall>>,
    showing: AtomicBool,
}

impl RecordingPanel {
    pub fn calls(&self) -> Vec<PanelCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn hides(&self) -> Vec<StateChangeReason> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PanelCall::Hide(reason) => Some(reason),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &PanelCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn last_search_term(&self) -> Option<SearchTermDisplay> {
        self.calls().into_iter().rev().find_map(|c| match c {
            PanelCall::SetSearchTerm(display) => Some(display),
            _ => None,
        })
    }

    fn record(&self, call: PanelCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PanelDriver for RecordingPanel {
    fn show_long_press(&self) {
        self.showing.store(true, Ordering::SeqCst);
        self.record(PanelCall::ShowLongPress);
    }

    fn show_tap_ui(&self) {
        self.showing.store(true, Ordering::SeqCst);
        self.record(PanelCall::ShowTapUi);
    }

    fn hide(&self, reason: StateChangeReason) {
        self.showing.store(false, Ordering::SeqCst);
        self.record(PanelCall::Hide(reason));
    }

    fn set_search_term(&self, display: &SearchTermDisplay) {
        self.record(PanelCall::SetSearchTerm(display.clone()));
    }

    fn is_showing(&self) -> bool {
        self.showing.load(Ordering::SeqCst)
    }

    fn is_peeking(&self) -> bool {
        false
    }
}

/// Serves one fixed page.
pub struct ScriptedProvider {
    available: bool,
    page: Mutex<SurroundingText>,
}

impl ScriptedProvider {
    pub fn new(page: SurroundingText) -> Self {
        Self {
            available: true,
            page: Mutex::new(page),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            page: Mutex::new(SurroundingText::default()),
        }
    }

    pub fn page(&self) -> SurroundingText {
        self.page.lock().unwrap().clone()
    }

    pub fn set_page(&self, page: SurroundingText) {
        *self.page.lock().unwrap() = page;
    }
}

#[async_trait]
impl SurroundingTextProvider for ScriptedProvider {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn request(&self) -> Result<SurroundingText, SurroundingTextError> {
        if !self.available {
            return Err(SurroundingTextError::NoBaseContent);
        }
        Ok(self.page())
    }
}

/// Resolves with a fixed response, or literally when none is set.
#[derive(Default)]
pub struct ScriptedResolver {
    response: Mutex<Option<ResolvedSearchTerm>>,
    requests: Mutex<Vec<ResolveRequest>>,
}

impl ScriptedResolver {
    pub fn returning(response: ResolvedSearchTerm) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ResolveRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn respond(&self, request: ResolveRequest) -> ResolvedSearchTerm {
        self.requests.lock().unwrap().push(request.clone());
        match self.response.lock().unwrap().clone() {
            Some(response) => response,
            None => ResolvedSearchTerm {
                search_term: request.selected_text.clone(),
                display_text: request.selected_text,
                ..ResolvedSearchTerm::default()
            },
        }
    }
}

#[async_trait]
impl SearchTermResolver for ScriptedResolver {
    async fn resolve(&self, request: ResolveRequest) -> ResolvedSearchTerm {
        self.respond(request)
    }
}

/// Always returns the same verdict and records what it was told.
pub struct ScriptedRanker {
    verdict: RankerVerdict,
    features: Mutex<Vec<(String, FeatureValue)>>,
    outcomes: Mutex<Vec<(String, FeatureValue)>>,
    resets: AtomicUsize,
}

impl ScriptedRanker {
    pub fn new(verdict: RankerVerdict) -> Self {
        Self {
            verdict,
            features: Mutex::new(Vec::new()),
            outcomes: Mutex::new(Vec::new()),
            resets: AtomicUsize::new(0),
        }
    }

    pub fn verdict(&self) -> RankerVerdict {
        self.verdict
    }

    pub fn features(&self) -> Vec<(String, FeatureValue)> {
        self.features.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<(String, FeatureValue)> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankingPredictor for ScriptedRanker {
    fn log_feature(&self, name: &str, value: FeatureValue) {
        self.features.lock().unwrap().push((name.to_string(), value));
    }

    async fn run_prediction(&self) -> RankerVerdict {
        self.verdict
    }

    fn log_outcome(&self, name: &str, value: FeatureValue) {
        self.outcomes.lock().unwrap().push((name.to_string(), value));
    }

    fn reset(&self) {
        self.features.lock().unwrap().clear();
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

/// The page most tests tap on. "Paris" spans chars 7..12.
pub fn paris_page(tap_offset: usize) -> SurroundingText {
    SurroundingText::new("UTF-8", "I love Paris in spring", tap_offset, tap_offset)
}

pub fn tap_metadata() -> TapMetadata {
    TapMetadata {
        font_size_dips: 16.0,
        text_run_length: 200,
        tap_duration_ms: 120,
        in_editable: false,
    }
}

pub fn gesture(kind: GestureKind, x: f32, y: f32, at_ms: u64) -> GestureEvent {
    GestureEvent::new(kind, Position::new(x, y), at_ms * MS)
}

/// A coordinator wired to in-memory collaborators, driven synchronously.
pub struct Harness {
    pub coordinator: ActivationCoordinator,
    pub panel: Arc<RecordingPanel>,
    pub provider: Arc<ScriptedProvider>,
    pub resolver: Arc<ScriptedResolver>,
    pub ranker: Option<Arc<ScriptedRanker>>,
    pub events: Arc<InMemoryEventBus>,
}

impl Harness {
    pub fn new(config: ActivationConfig) -> Self {
        Self::build(config, ScriptedProvider::new(paris_page(9)), ScriptedResolver::default(), None)
    }

    pub fn build(
        config: ActivationConfig,
        provider: ScriptedProvider,
        resolver: ScriptedResolver,
        ranker: Option<ScriptedRanker>,
    ) -> Self {
        let panel = Arc::new(RecordingPanel::default());
        let provider = Arc::new(provider);
        let resolver = Arc::new(resolver);
        let ranker = ranker.map(Arc::new);
        let events = Arc::new(InMemoryEventBus::new());

        let collaborators = Collaborators {
            panel: panel.clone(),
            surrounding_text: provider.clone(),
            ranker: ranker
                .clone()
                .map(|r| r as Arc<dyn RankingPredictor>),
            events: events.clone(),
        };
        let coordinator = ActivationCoordinator::new(Arc::new(config), collaborators);

        Self {
            coordinator,
            panel,
            provider,
            resolver,
            ranker,
            events,
        }
    }

    /// Tap gesture followed by the unhandled-tap report.
    pub fn tap(&mut self, x: f32, y: f32, at_ms: u64) {
        self.coordinator
            .handle_gesture(&gesture(GestureKind::Tap, x, y, at_ms));
        self.coordinator.handle_unhandled_tap(tap_metadata());
    }

    /// Run queued work until only timers are left; returns their tickets.
    pub fn drive(&mut self) -> Vec<WorkTicket> {
        let mut timers = Vec::new();
        loop {
            let work = self.coordinator.take_pending_work();
            if work.is_empty() {
                return timers;
            }
            for item in work {
                match item {
                    PendingWork::RequestSurroundingText { ticket } => {
                        let page = self.provider.page();
                        self.coordinator.on_surrounding_text(ticket, Ok(page));
                    }
                    PendingWork::RunPrediction { ticket } => {
                        let verdict = self
                            .ranker
                            .as_ref()
                            .map(|r| r.verdict())
                            .unwrap_or(RankerVerdict::Undetermined);
                        self.coordinator.on_ranking_verdict(ticket, verdict);
                    }
                    PendingWork::Resolve { ticket, request } => {
                        let resolved = self.resolver.respond(request);
                        self.coordinator.on_resolved(ticket, resolved);
                    }
                    PendingWork::Timer { ticket, .. } => timers.push(ticket),
                }
            }
        }
    }

    /// Drive, firing every timer as it comes up.
    pub fn drive_all(&mut self) {
        loop {
            let timers = self.drive();
            if timers.is_empty() {
                return;
            }
            for ticket in timers {
                self.coordinator.on_timer_elapsed(ticket);
            }
        }
    }

    /// Every state entered so far, in order.
    pub fn visited(&self) -> Vec<InternalState> {
        self.events
            .payloads_for::<StateChangedEvent>(event_names::STATE_CHANGED)
            .into_iter()
            .map(|e| e.to)
            .collect()
    }
}
