//! Axum-specific error types and mappings.
//!
//! Every failure reaches the client as `{"error": "<message>"}` with a
//! status code picked from the core error that caused it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use mimic_core::{MetaError, RelayError, RouteError, Unavailable};

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input, failed relay).
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// The service reports itself as not ready.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Internal error, including "not healthy".
    #[error("{0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<Unavailable> for HttpError {
    fn from(err: Unavailable) -> Self {
        match err {
            Unavailable::NotReady => Self::ServiceUnavailable(err.to_string()),
            Unavailable::NotHealthy => Self::Internal(err.to_string()),
        }
    }
}

impl From<RelayError> for HttpError {
    fn from(err: RelayError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<RouteError> for HttpError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound { .. } => Self::NotFound(err.to_string()),
            RouteError::AlreadyExists { .. } | RouteError::Invalid(_) | RouteError::Parse(_) => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<MetaError> for HttpError {
    fn from(err: MetaError) -> Self {
        Self::Internal(err.to_string())
    }
}
