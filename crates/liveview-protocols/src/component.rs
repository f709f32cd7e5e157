//! Routable component protocol definitions.
//!
//! A routable component is the server-side half of one page: it renders
//! the initial markup for its path, reacts to client events and pushes
//! [`ServerCommand`]s back to the browser.
//!
//! ## Lifecycle
//!
//! Components are created once per session by the host's component factory
//! and live as long as the session router. Navigating away calls
//! [`RoutableComponent::clean_up`] but keeps the component, so its fields
//! survive a round trip away and back. All methods take `&self`; components
//! hold their mutable state behind interior mutability.
//!
//! Per-router state should be keyed by the router id passed to
//! [`RoutableComponent::set_query_parameters`] and
//! [`RoutableComponent::clean_up`], so one component type can serve many
//! concurrent sessions without cross-talk.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::connection::{Connection, ConnectionHandle};
use crate::error::{ComponentError, ConnectionError};
use crate::message::{ClientEvent, ServerCommand};

/// Query parameters extracted from a navigated URL.
pub type QueryParameters = HashMap<String, String>;

/// Server-side unit representing one URL.
#[async_trait]
pub trait RoutableComponent: Send + Sync {
    /// Path this component is mounted at, compared by exact equality.
    fn path(&self) -> &str;

    /// Stable identity of the component. Defaults to its path.
    fn id(&self) -> &str {
        self.path()
    }

    /// Serializable snapshot of the component's context.
    fn context_snapshot(&self) -> Option<Value> {
        None
    }

    /// Restore the component's context from a snapshot.
    fn load_from_context(&self, _context: Value) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Markup sent as `replaceBody` when the component becomes active.
    async fn base_template(&self) -> Result<String, ComponentError>;

    /// Receive the query parameters of the navigated URL.
    fn set_query_parameters(&self, _parameters: QueryParameters, _router_id: Uuid) {}

    /// Drop any state kept for `router_id`. Called on every navigation
    /// attempt while the component is active, so it must be idempotent.
    fn clean_up(&self, _router_id: Uuid) {}

    /// Bind (or rebind after a reconnect) the session's current connection.
    fn bind_connection(&self, _connection: Option<ConnectionHandle>) {}

    /// React to one client event.
    async fn receive_event(
        &self,
        connection: &ConnectionHandle,
        event: &ClientEvent,
    ) -> Result<(), ComponentError>;

    /// Send one command. Closed connections are skipped with a warning.
    async fn send_command(&self, connection: &dyn Connection, command: &ServerCommand) {
        match connection.send_command(command).await {
            Ok(()) => {}
            Err(ConnectionError::Closed) => {
                warn!(
                    "Could not send {} from {}: connection {} is already closed",
                    command.action.tag(),
                    self.path(),
                    connection.id()
                );
            }
            Err(e) => {
                warn!("Failed to send {} to {}: {}", command.action.tag(), connection.id(), e);
            }
        }
    }

    /// Send the same command to every connection in `connections`.
    async fn broadcast(&self, connections: &[ConnectionHandle], command: &ServerCommand) {
        for connection in connections {
            self.send_command(&**connection, command).await;
        }
    }
}

#[cfg(test)]
#[path = "component_tests.rs"]
mod tests;
