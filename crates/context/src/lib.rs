//! Page context for tapsearch.
//!
//! This crate holds everything known about the page around a gesture:
//! - Surrounding text and selection offsets (`SurroundingText`, `Context`)
//! - Word analysis around a tap (tapped word, neighbors, offset in word)
//! - Selection limits (length, word characters, editable fields)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                             │
//! │  state.rs    - SurroundingText, Context                      │
//! │  analysis.rs - Word analysis (pure)                          │
//! │  limits.rs   - Selection limits and char classes (pure)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Collaborator Contract                      │
//! │  provider.rs - SurroundingTextProvider (async)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use tapsearch_context::{Context, SurroundingText};
//! use uuid::Uuid;
//!
//! let mut context = Context::new(Uuid::new_v4());
//! context.set_surrounding_text(SurroundingText::new("UTF-8", "Visit Paris now", 8, 8));
//! context.analyze_tap(8);
//! assert_eq!(context.tapped_word().map(|w| w.text.as_str()), Some("Paris"));
//! ```

mod analysis;
mod error;
mod limits;
mod provider;
mod state;

pub use analysis::{analyze_tap, Word, WordAnalysis};
pub use error::{Result, SurroundingTextError};
pub use limits::{
    check_selection, contains_word_characters, is_ideographic, is_word_char, SelectionCheck,
    MAX_SELECTION_LENGTH,
};
pub use provider::{NullProvider, SurroundingTextProvider};
pub use state::{Context, SurroundingText};
