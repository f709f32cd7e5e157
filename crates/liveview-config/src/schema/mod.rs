//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_auth;

pub use schema_auth::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the WebSocket upgrade endpoint.
    #[serde(default = "default_websocket_path")]
    pub websocket_path: String,

    /// Path of the token issuing endpoint.
    #[serde(default = "default_token_path")]
    pub token_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            websocket_path: default_websocket_path(),
            token_path: default_token_path(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_websocket_path() -> String {
    "/websocket".to_string()
}

fn default_token_path() -> String {
    "/api/issue-token".to_string()
}

/// What happens to a session once its inactivity watchdog fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStrategy {
    /// Discard the session router.
    #[default]
    Delete,
    /// Hand the session router to a swap store.
    Swap,
}

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds without client events before the strategy runs.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_secs: u64,

    #[serde(default)]
    pub strategy: SessionStrategy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: default_inactivity_timeout(),
            strategy: SessionStrategy::default(),
        }
    }
}

fn default_inactivity_timeout() -> u64 {
    3600
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
