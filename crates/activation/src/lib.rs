//! Gesture-triggered contextual search activation.
//!
//! Decides, for each tap or long-press on page text, whether to show the
//! search panel, what to search for, and how the panel's lifecycle is
//! sequenced.
//!
//! # Architecture
//!
//! ```text
//! platform ──► ActivationHandle ──► ActivationService (one tokio task)
//!                                        │
//!                                        ▼
//!                              ActivationCoordinator
//!                 ┌──────────────┬───────┴───────┬────────────────┐
//!                 ▼              ▼               ▼                ▼
//!        GestureStateMachine  SelectionTracker  HeuristicSet   Context
//!                                        │
//!                    PendingWork ────────┘  (spawned tasks post results back)
//!                        │
//!     SurroundingTextProvider / RankingPredictor / SearchTermResolver / timers
//! ```
//!
//! The coordinator is synchronous and can be driven directly (as the tests
//! do); the service adds the tokio plumbing.

mod config;
mod coordinator;
mod error;
mod panel;
mod resolver;
mod service;

pub use config::{
    ActivationConfig, TimingConfig, DEFAULT_TAP_NEAR_PREVIOUS_WINDOW_MS,
    DEFAULT_TAP_ON_TAP_SELECTION_WINDOW_MS,
};
pub use coordinator::{ActivationCoordinator, Collaborators, PendingWork};
pub use error::{ActivationError, ConfigError, Result};
pub use panel::{PanelDriver, SearchTermDisplay};
pub use resolver::{LiteralResolver, ResolveRequest, ResolvedSearchTerm, SearchTermResolver};
pub use service::{ActivationCommand, ActivationHandle, ActivationService, ActivationStatus};
