//! # Error Types
//!
//! This module defines error types used throughout the marco library.

use thiserror::Error;

/// Main error type for marco operations
#[derive(Debug, Error)]
pub enum MarcoError {
    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(String),

    /// Source image could not be fetched
    #[error("Load error: {0}")]
    Load(String),

    /// Feedback form rejected before reaching the store.
    /// The message is meant to be shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    /// Submission store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Notification delivery failure
    #[error("Notify error: {0}")]
    Notify(String),

    /// Invalid frame catalog or other configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Server-level errors (bind, serve)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarcoError {
    /// Whether the error came from user input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, MarcoError::Validation(_))
    }
}
