//! Domain error model.

use thiserror::Error;

/// Result type used across the service layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic request failures (validation,
/// missing records, conflicts). Backend faults are wrapped as `Internal`
/// and surfaced generically at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request payload was malformed (e.g. missing/empty id).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A record with the same id already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unexpected backend failure (I/O, SQL, parse). Never retried.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
