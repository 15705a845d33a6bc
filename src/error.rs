//! Error types for the demo-mode simulation layer
//!
//! This module defines the error types used throughout the crate. The main
//! error type is `DemoError`, which can represent the conditions that
//! surface while routing mock API calls or mutating the session store.

use thiserror::Error;

/// Main error type for the demo-mode simulation layer
#[derive(Error, Debug)]
pub enum DemoError {
    /// I/O operation failed (flag file reads/writes)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error (JSON): {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// TOML configuration error
    #[error("Configuration error (TOML): {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A dispatched call was cancelled while awaiting its latency delay
    #[error("Call cancelled: {0}")]
    Cancelled(String),
}

/// Result type alias for operations that can fail with a [DemoError]
pub type DemoResult<T> = std::result::Result<T, DemoError>;

impl DemoError {
    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        DemoError::InvalidInput(msg.into())
    }

    /// Create a new not found error
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        DemoError::NotFound(what.into())
    }

    /// Create a new cancelled error
    pub fn cancelled<S: Into<String>>(what: S) -> Self {
        DemoError::Cancelled(what.into())
    }
}
