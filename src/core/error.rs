//! API error types and response formatting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Boundary error taxonomy. Pipeline stages report failures as `anyhow`
/// errors; only the HTTP boundary maps errors onto status codes.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request shape or parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Unknown requestId.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was already reviewed; the decision is final.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage or event dispatch failure.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Internal(err) => {
                tracing::error!("internal server error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
