//! # Error Types
//!
//! - No silent failures
//! - Use `Result<T, LocalSyncError>` for fallible operations
//! - The store never panics; all errors are recoverable by the caller

use thiserror::Error;

/// Errors that can occur in the LocalSync system.
#[derive(Debug, Error)]
pub enum LocalSyncError {
    /// An I/O error occurred (file access, socket bind, background task).
    #[error("I/O error: {0}")]
    Io(String),

    /// The document could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The bytes could not be decoded into a document.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A JSON value was well-formed but is not a document (top-level object).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A payload exceeded the configured size limit.
    #[error("Payload of {size} bytes exceeds maximum allowed {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for LocalSyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
