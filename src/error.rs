//! Application error taxonomy and its HTTP representation.
//!
//! Every failure path of the allocator and resolver produces one of these
//! variants. Collisions on `short_path` are deliberately absent: they are
//! absorbed by the allocator's retry loop and never reach a caller.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned in JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The input does not parse as an absolute URL with a scheme and a host.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// The URL's host is on the loopback / self-referential denylist.
    #[error("{message}")]
    BlacklistedUrl { message: String, details: Value },

    /// The code generator was asked for a non-positive length.
    #[error("Short path length must be greater than 0, got {length}")]
    InvalidLength { length: i64 },

    /// Every allocation attempt collided with an existing short path.
    #[error(
        "The short URL could not be generated after {attempts} attempts, please try again later"
    )]
    AllocationExhausted { attempts: usize },

    /// More than one live row matched a query expected to match at most one.
    #[error("{message}")]
    AmbiguousState { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The request body is not the expected JSON shape.
    #[error("{message}")]
    MalformedRequest { message: String, details: Value },

    /// Any storage error not classified above (transport, timeout, constraint).
    #[error("{message}")]
    StorageFailure { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn blacklisted_url(message: impl Into<String>, details: Value) -> Self {
        Self::BlacklistedUrl {
            message: message.into(),
            details,
        }
    }

    pub fn ambiguous_state(message: impl Into<String>, details: Value) -> Self {
        Self::AmbiguousState {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn malformed_request(message: impl Into<String>, details: Value) -> Self {
        Self::MalformedRequest {
            message: message.into(),
            details,
        }
    }

    pub fn storage_failure(message: impl Into<String>, details: Value) -> Self {
        Self::StorageFailure {
            message: message.into(),
            details,
        }
    }

    /// Returns the HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. }
            | AppError::BlacklistedUrl { .. }
            | AppError::InvalidLength { .. }
            | AppError::AllocationExhausted { .. }
            | AppError::AmbiguousState { .. }
            | AppError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::StorageFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let message = self.to_string();
        match self {
            AppError::InvalidUrl { details, .. } => ErrorInfo {
                code: "invalid_url",
                message,
                details: details.clone(),
            },
            AppError::BlacklistedUrl { details, .. } => ErrorInfo {
                code: "blacklisted_url",
                message,
                details: details.clone(),
            },
            AppError::InvalidLength { length } => ErrorInfo {
                code: "invalid_length",
                message,
                details: json!({ "length": length }),
            },
            AppError::AllocationExhausted { attempts } => ErrorInfo {
                code: "allocation_exhausted",
                message,
                details: json!({ "attempts": attempts, "retryable": true }),
            },
            AppError::AmbiguousState { details, .. } => ErrorInfo {
                code: "ambiguous_state",
                message,
                details: details.clone(),
            },
            AppError::NotFound { details, .. } => ErrorInfo {
                code: "not_found",
                message,
                details: details.clone(),
            },
            AppError::MalformedRequest { details, .. } => ErrorInfo {
                code: "malformed_request",
                message,
                details: details.clone(),
            },
            AppError::StorageFailure { details, .. } => ErrorInfo {
                code: "storage_failure",
                message,
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e.as_database_error().and_then(|db| db.constraint()) {
            Some(constraint) => {
                tracing::error!("Database error on constraint {}: {}", constraint, e);
            }
            None => {
                tracing::error!("Database error: {}", e);
            }
        }

        AppError::storage_failure("Database error", json!({}))
    }
}
