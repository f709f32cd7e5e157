//! Token and health handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Issue a fresh session token as plain text.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.issuer.issue()?;
    debug!("Issued session token");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        token,
    ))
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub sessions: usize,
    pub connections: usize,
    pub timestamp: String,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        sessions: state.registry.session_count(),
        connections: state.registry.connection_count(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
