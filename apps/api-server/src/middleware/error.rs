//! Error handling - RFC 7807 compliant responses for the domain taxonomy.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use fleet_core::DomainError;
use fleet_core::error::RepoError;
use fleet_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    InvalidCredentials,
    OtpExpired,
    OtpMismatch,
    Unauthorized,
    Forbidden,
    Conflict(String),
    Unavailable(String),
    NotificationFailed(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::OtpExpired => write!(f, "One-time code expired"),
            AppError::OtpMismatch => write!(f, "One-time code mismatch"),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unavailable(msg) => write!(f, "Unavailable: {}", msg),
            AppError::NotificationFailed(msg) => write!(f, "Notification failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::OtpExpired => StatusCode::UNAUTHORIZED,
            AppError::OtpMismatch => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::CONFLICT,
            AppError::NotificationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::InvalidCredentials => {
                ErrorResponse::new(401, "Invalid Credentials")
                    .with_detail("Invalid email or password.")
            }
            // Distinct titles so clients can prompt correctly.
            AppError::OtpExpired => ErrorResponse::new(401, "Code Expired")
                .with_detail("The one-time code has expired. Please log in again."),
            AppError::OtpMismatch => ErrorResponse::new(401, "Code Mismatch")
                .with_detail("The one-time code is incorrect."),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Unavailable(detail) => {
                ErrorResponse::new(409, "Unavailable").with_detail(detail.clone())
            }
            AppError::NotificationFailed(detail) => {
                tracing::error!("Notification dispatch failed: {}", detail);
                ErrorResponse::bad_gateway("Could not deliver the login code. Please retry.")
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(entity) => AppError::NotFound(format!("{entity} not found")),
            DomainError::Conflict(field) => {
                AppError::Conflict(format!("{field} is already registered"))
            }
            DomainError::InvalidCredentials => AppError::InvalidCredentials,
            DomainError::OtpExpired => AppError::OtpExpired,
            DomainError::OtpMismatch => AppError::OtpMismatch,
            DomainError::Unavailable(msg) => AppError::Unavailable(msg),
            DomainError::Forbidden => AppError::Forbidden,
            DomainError::InvalidQuery(msg) => AppError::BadRequest(msg),
            DomainError::NotificationFailed(msg) => AppError::NotificationFailed(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                tracing::error!("Store error: {}", msg);
                AppError::Internal("Store error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
