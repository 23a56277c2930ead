//! API error taxonomy for the Refdesk server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use refdesk_core::db::DatabaseError;

/// Errors surfaced to HTTP callers.
///
/// Every route-level failure maps to exactly one of these; the HTTP body
/// carries the short human-readable message, nothing more.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required input.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid session.
    #[error("{0}")]
    Auth(String),

    /// Valid session with insufficient role.
    #[error("{0}")]
    Forbidden(String),

    /// Referenced entity absent.
    #[error("{0}")]
    NotFound(String),

    /// Underlying store failure.
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            other => {
                error!(error = %other, "Database operation failed");
                Self::Storage("Internal storage error".to_string())
            }
        }
    }
}
