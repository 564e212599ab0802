//! Error types shared across the store, pipeline and CLI layers

use std::fmt;
use thiserror::Error;

/// Result type for all store and pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Library-wide error taxonomy
///
/// `Io`, `Serialization` and `Storage` together make up the storage-failure
/// class; `NotFound` is kept separate so callers can distinguish a missing
/// backlog from an unreadable one.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backlog or submission target does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Vote submitted without the identity the backlog requires
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// Malformed input caught before persistence
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage backend failure not covered by a more specific variant
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Create a not-found error
    pub fn not_found<M: fmt::Display>(msg: M) -> Self {
        Self::NotFound(msg.to_string())
    }

    /// Create a policy-violation error
    pub fn policy<M: fmt::Display>(msg: M) -> Self {
        Self::PolicyViolation(msg.to_string())
    }

    /// Create a validation error
    pub fn validation<M: fmt::Display>(msg: M) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create a storage error
    pub fn storage<M: fmt::Display>(msg: M) -> Self {
        Self::Storage(msg.to_string())
    }

    /// Whether this error means the target simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
