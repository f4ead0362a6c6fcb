//! Error types for surrounding-text extraction.

use thiserror::Error;

/// Errors a surrounding-text provider can report.
#[derive(Debug, Error)]
pub enum SurroundingTextError {
    /// There is no page (or no content) to read text from.
    #[error("no base content available")]
    NoBaseContent,

    /// The provider gave up before producing text.
    #[error("surrounding text request failed: {0}")]
    RequestFailed(String),
}

pub type Result<T> = std::result::Result<T, SurroundingTextError>;
