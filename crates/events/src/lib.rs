//! Diagnostic event contracts for the activation pipeline.
//!
//! The coordinator publishes these DTOs on an [`EventBus`]. Sharing the
//! types keeps producers and consumers agreeing on field names.

mod bus;

pub use bus::{
    publish, EmittedEvent, EventBus, EventBusRef, InMemoryEventBus, NullEventBus, TracingEventBus,
};

use serde::{Deserialize, Serialize};
use tapsearch_gesture::{InternalState, StateChangeReason};
use tapsearch_heuristics::{HeuristicKind, RankerVerdict};
use uuid::Uuid;

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Emitted on every state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChangedEvent {
    /// Sequence the transition belongs to; absent while idle.
    #[serde(default)]
    pub sequence_id: Option<Uuid>,
    pub from: InternalState,
    pub to: InternalState,
    pub reason: StateChangeReason,
    #[serde(default)]
    pub ts_ms: i64,
}

/// Emitted when a tap is suppressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppressedEvent {
    #[serde(default)]
    pub sequence_id: Option<Uuid>,
    /// Heuristics that voted to suppress. Empty when the ranker suppressed.
    #[serde(default)]
    pub heuristics: Vec<HeuristicKind>,
    #[serde(default)]
    pub ranker_verdict: Option<RankerVerdict>,
    #[serde(default)]
    pub ts_ms: i64,
}

/// Emitted whenever the panel is given a search term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTermEvent {
    #[serde(default)]
    pub sequence_id: Option<Uuid>,
    pub search_term: String,
    pub display_text: String,
    /// The term is the raw selected text, not a resolved one.
    #[serde(default)]
    pub is_literal: bool,
    #[serde(default)]
    pub ts_ms: i64,
}

/// Emitted when an async result arrives for a visit that is no longer current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleResultEvent {
    /// Which kind of result it was (e.g., "surrounding_text").
    pub result: String,
    /// State the result was issued for.
    pub issued_for: InternalState,
    /// State the pipeline is in now.
    pub current: InternalState,
    #[serde(default)]
    pub ts_ms: i64,
}

/// Event names as constants to prevent typos.
pub mod event_names {
    pub const STATE_CHANGED: &str = "activation:state_changed";
    pub const SUPPRESSED: &str = "activation:suppressed";
    pub const SEARCH_TERM: &str = "activation:search_term";
    pub const STALE_RESULT: &str = "activation:stale_result";
}
