//! Provider trait for gathering text around a selection.
//!
//! Page-content extraction lives outside this workspace; this trait is the
//! whole contract with it.

use crate::error::{Result, SurroundingTextError};
use crate::state::SurroundingText;
use async_trait::async_trait;

/// Source of the text surrounding the current selection or tap.
#[async_trait]
pub trait SurroundingTextProvider: Send + Sync {
    /// Whether there is base content to read from at all.
    ///
    /// When this returns false the gathering step is never started.
    fn is_available(&self) -> bool {
        true
    }

    /// Gather the text around the current selection.
    async fn request(&self) -> Result<SurroundingText>;
}

/// Null implementation for testing or hosts without page access.
pub struct NullProvider;

#[async_trait]
impl SurroundingTextProvider for NullProvider {
    fn is_available(&self) -> bool {
        false
    }

    async fn request(&self) -> Result<SurroundingText> {
        Err(SurroundingTextError::NoBaseContent)
    }
}
