//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use mergulho_core::Error;

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The addressed resource does not exist.
    NotFound(String),
    /// The request body could not be used.
    BadRequest(String),
    /// The document store failed.
    Store(Error),
}

impl ApiError {
    pub fn not_found(detail: impl Into<String>) -> Self {
        ApiError::NotFound(detail.into())
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Store(err) => {
                let status = match &err {
                    Error::NotFound { .. } => StatusCode::NOT_FOUND,
                    Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    Error::Transport(_) | Error::Protocol(_) => StatusCode::BAD_GATEWAY,
                };
                if status.is_server_error() {
                    error!(error = %err, "Store request failed");
                }
                (status, err.to_string())
            }
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
