//! Application state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use liveview_core::{ConnectionRegistry, TokenIssuer};

/// State shared across handlers.
pub struct AppState {
    pub registry: Arc<ConnectionRegistry>,
    pub issuer: Arc<dyn TokenIssuer>,
    start_time: Instant,
}

impl AppState {
    pub fn new(registry: Arc<ConnectionRegistry>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            registry,
            issuer,
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
