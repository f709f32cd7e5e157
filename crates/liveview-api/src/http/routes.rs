//! HTTP route definitions.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::http::handlers::{health, issue_token};
use crate::state::AppState;
use crate::websocket::ws_handler;

/// Paths the transport is mounted at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub websocket_path: String,
    pub token_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            websocket_path: "/websocket".to_string(),
            token_path: "/api/issue-token".to_string(),
        }
    }
}

/// Create the transport router.
///
/// ```text
/// GET {websocket_path}?authToken=..&initialURL=..  - WebSocket upgrade
/// GET {token_path}                                 - Issue a session token
/// GET /health                                      - Health check
/// ```
pub fn create_router(state: Arc<AppState>, routes: &RouteConfig) -> Router {
    Router::new()
        .route(&routes.websocket_path, get(ws_handler))
        .route(&routes.token_path, get(issue_token))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
