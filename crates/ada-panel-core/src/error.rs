//! Error types for persistence and speech.
//!
//! None of these reach the host page: the widget logs them and carries on.

use thiserror::Error;

/// Errors raised by a [`crate::storage::Storage`] backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend cannot be used at all (disabled, sandboxed, missing).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// Writing would exceed the backend's capacity.
    #[error("Storage quota exceeded writing '{key}'")]
    QuotaExceeded { key: String },
}

/// Errors raised by the speech controller or its engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// No speech synthesis capability is present.
    #[error("Speech synthesis is not supported")]
    Unsupported,

    #[error("Speech engine error: {0}")]
    Engine(String),
}
