//! Error types for configuration and the activation service.

use thiserror::Error;

/// Result type for activation operations.
pub type Result<T> = std::result::Result<T, ActivationError>;

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("'{field}' must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("'{min_field}' ({min}) must not exceed '{max_field}' ({max})")]
    Inverted {
        min_field: &'static str,
        min: u64,
        max_field: &'static str,
        max: u64,
    },

    #[error("'{field}' must be a finite positive number, got {value}")]
    InvalidFactor { field: &'static str, value: f32 },
}

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The service task is gone; commands can no longer be delivered.
    #[error("Activation service is not running")]
    ServiceStopped,
}
