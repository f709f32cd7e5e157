//! In-memory archive for sessions evicted by the swap strategy.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use liveview_core::SwappedSession;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

/// What is kept of a swapped-out session.
#[derive(Debug, Clone)]
pub struct SwapEntry {
    pub router_id: Uuid,
    /// Path of the component that was active when the session was swapped.
    pub active_path: Option<String>,
    /// Context snapshot of that component.
    pub context: Option<Value>,
    pub swapped_at: DateTime<Utc>,
}

/// Swapped sessions keyed by identity. A later swap of the same identity
/// replaces the earlier entry.
#[derive(Default)]
pub struct SwapStore {
    entries: DashMap<String, SwapEntry>,
}

impl SwapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, swapped: SwappedSession) {
        let entry = SwapEntry {
            router_id: swapped.router.id(),
            active_path: swapped
                .active_component
                .as_ref()
                .map(|component| component.path().to_string()),
            context: swapped
                .active_component
                .as_ref()
                .and_then(|component| component.context_snapshot()),
            swapped_at: Utc::now(),
        };
        info!(
            "Swapped out session {} at {} (active: {})",
            entry.router_id,
            entry.swapped_at.to_rfc3339(),
            entry.active_path.as_deref().unwrap_or("none")
        );
        if let Some(context) = &entry.context {
            debug!("Archived context of {}: {}", entry.router_id, context);
        }
        self.entries.insert(swapped.identity, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
