//! Gesture classification and selection tracking.
//!
//! Raw pointer and selection notifications from the platform flow into a
//! single [`SelectionTracker`], which classifies them as a tap, a long-press
//! or neither, and keeps the authoritative [`SelectionSnapshot`].
//!
//! The tracker never drives the pipeline itself; every handler returns a
//! [`SelectionNotice`] describing what the caller should do next.

mod event;
mod snapshot;
mod tracker;

pub use event::{GestureEvent, GestureKind, Position, SelectionChange, TapMetadata};
pub use snapshot::{SelectionSnapshot, SelectionType, TapPoint, TapRecord};
pub use tracker::{SelectionNotice, SelectionTracker};
