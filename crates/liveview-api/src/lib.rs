//! # LiveView API
//!
//! Transport layer for LiveView sessions.
//!
//! - **WebSocket**: one socket per browser tab, fed into the
//!   [`ConnectionRegistry`](liveview_core::ConnectionRegistry)
//! - **HTTP**: session token issuing and a health endpoint
//! - **Script injection**: helper for serving host pages with the client
//!   script inlined
//!
//! ## Connection lifecycle
//!
//! ```text
//! GET /websocket?authToken=..&initialURL=..
//!        │ upgrade
//!        ▼
//!   registry.accept ──fail──▶ close
//!        │
//!        ▼
//!   text frame ──▶ registry.on_inbound_message ──▶ session router
//!        │
//!   socket ends ──▶ registry.on_connection_closed
//! ```

pub mod error;
pub mod http;
pub mod inject;
pub mod server;
pub mod state;
pub mod websocket;

pub use error::ApiError;
pub use http::routes::{RouteConfig, create_router};
pub use inject::inject_script;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
pub use websocket::{ConnectParams, WsConnection, ws_handler};
