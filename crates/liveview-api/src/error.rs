//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use liveview_core::AuthError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Listen address could not be parsed.
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// Socket bind or serve failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Token could not be issued.
    #[error("Token error: {0}")]
    Token(#[from] AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        let status = match self {
            ApiError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) | ApiError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, status.canonical_reason().unwrap_or("error")).into_response()
    }
}
