//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
///
/// Credential failures are deliberately coarse: an unknown email and a
/// wrong password both surface as `InvalidCredentials` so callers cannot
/// probe which accounts exist. OTP failures stay distinct so clients can
/// prompt for a fresh login vs. a retyped code.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Duplicate unique field: {0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("One-time code has expired")]
    OtpExpired,

    #[error("One-time code does not match")]
    OtpMismatch,

    #[error("Resource unavailable: {0}")]
    Unavailable(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Notification dispatch failed: {0}")]
    NotificationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store operation failed: {0}")]
    Query(String),

    #[error("Record not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::NotFound("record"),
            RepoError::Constraint(msg) => DomainError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}
