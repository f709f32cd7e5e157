//! Connection registry.
//!
//! The registry is the entry point for the transport layer. It maps each
//! authenticated session identity to one [`SessionRouter`], tracks the live
//! connections for broadcasts, and turns every failure it sees into a
//! closed connection.

mod strategy;

pub use strategy::{CloseStrategy, SwapCompletion, SwappedSession};

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use liveview_protocols::{ClientEvent, ConnectionHandle};
use tracing::{debug, error, info, warn};

use crate::auth::Authenticator;
use crate::error::RouterError;
use crate::router::{ComponentHandle, SessionRouter, TimeoutCallback};
use strategy::SessionMap;

/// Builds the component set of a new session. Called once per session.
pub type ComponentFactory = Arc<dyn Fn() -> Vec<ComponentHandle> + Send + Sync>;

/// Called after every successful [`ConnectionRegistry::accept`].
pub type ConnectionCreatedHook = Arc<dyn Fn(&Arc<SessionRouter>) + Send + Sync>;

struct LiveConnection {
    connection: ConnectionHandle,
    identity: String,
}

/// Process-wide map of sessions and live connections.
pub struct ConnectionRegistry {
    template: SessionRouter,
    factory: ComponentFactory,
    authenticator: Arc<dyn Authenticator>,
    strategy: CloseStrategy,
    on_connection_created: Option<ConnectionCreatedHook>,
    sessions: Arc<SessionMap>,
    live: DashMap<String, LiveConnection>,
}

impl ConnectionRegistry {
    /// Create a registry with a default template router and the default
    /// close strategy.
    pub fn new<F>(authenticator: Arc<dyn Authenticator>, factory: F) -> Self
    where
        F: Fn() -> Vec<ComponentHandle> + Send + Sync + 'static,
    {
        Self {
            template: SessionRouter::new(),
            factory: Arc::new(factory),
            authenticator,
            strategy: CloseStrategy::default(),
            on_connection_created: None,
            sessions: Arc::new(DashMap::new()),
            live: DashMap::new(),
        }
    }

    /// Router every new session is copied from.
    pub fn with_template(mut self, template: SessionRouter) -> Self {
        self.template = template;
        self
    }

    pub fn with_close_strategy(mut self, strategy: CloseStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_connection_created_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Arc<SessionRouter>) + Send + Sync + 'static,
    {
        self.on_connection_created = Some(Arc::new(hook));
        self
    }

    pub fn close_strategy(&self) -> &CloseStrategy {
        &self.strategy
    }

    /// Admit a new connection.
    ///
    /// Authenticates `identity`, creates its session on first sight, binds
    /// `connection` to it and navigates to `initial_url`. The inactivity
    /// timer restarts, so a session that never sends an event still expires.
    /// Returns the session router, or `None` after closing the connection
    /// on failure.
    pub async fn accept(
        &self,
        connection: ConnectionHandle,
        identity: &str,
        initial_url: &str,
    ) -> Option<Arc<SessionRouter>> {
        if let Err(e) = self.authenticator.authenticate(identity) {
            warn!("Rejected connection {}: {}", connection.id(), e);
            connection.close().await;
            return None;
        }

        let router = match self.session_for(identity) {
            Ok(router) => router,
            Err(e) => {
                error!("Could not create session for connection {}: {}", connection.id(), e);
                connection.close().await;
                return None;
            }
        };

        self.live.insert(
            connection.id().to_string(),
            LiveConnection {
                connection: Arc::clone(&connection),
                identity: identity.to_string(),
            },
        );

        if let Err(e) = router.attach(Arc::clone(&connection), initial_url).await {
            warn!(
                "Initial navigation to {} failed for connection {}: {}",
                initial_url,
                connection.id(),
                e
            );
            self.live.remove(connection.id());
            connection.close().await;
            return None;
        }

        let on_timeout = self.timeout_callback(identity.to_string(), &router);
        router
            .restart_timeout(self.strategy.after(), on_timeout)
            .await;

        info!(
            "Connection {} attached to session {}",
            connection.id(),
            router.id()
        );
        if let Some(hook) = &self.on_connection_created {
            hook(&router);
        }
        Some(router)
    }

    /// Handle one inbound text frame from `connection`.
    pub async fn on_inbound_message(&self, connection: ConnectionHandle, text: &str) {
        let event = match ClientEvent::decode(text) {
            Ok(event) => event,
            Err(e) => {
                warn!("Closing connection {}: {}", connection.id(), e);
                connection.close().await;
                return;
            }
        };

        if let Err(e) = self.authenticator.authenticate(&event.auth_token) {
            warn!("Closing connection {}: {}", connection.id(), e);
            connection.close().await;
            return;
        }

        let Some(router) = self.session(&event.auth_token) else {
            warn!(
                "Closing connection {}: no session for its token",
                connection.id()
            );
            connection.close().await;
            return;
        };

        let on_timeout = self.timeout_callback(event.auth_token.clone(), &router);
        router
            .dispatch(event, connection, self.strategy.after(), on_timeout)
            .await;
    }

    /// Forget a closed connection. Its session stays registered.
    pub fn on_connection_closed(&self, connection: &ConnectionHandle) {
        if let Some((_, live)) = self.live.remove(connection.id()) {
            debug!(
                "Connection {} closed, {} still live",
                live.connection.id(),
                self.live.len()
            );
        }
    }

    /// Snapshot of the live connections.
    pub fn connections(&self) -> Vec<ConnectionHandle> {
        self.live
            .iter()
            .map(|entry| Arc::clone(&entry.value().connection))
            .collect()
    }

    /// Live connections belonging to `identity`.
    pub fn connections_for(&self, identity: &str) -> Vec<ConnectionHandle> {
        self.live
            .iter()
            .filter(|entry| entry.value().identity == identity)
            .map(|entry| Arc::clone(&entry.value().connection))
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.live.len()
    }

    pub fn session(&self, identity: &str) -> Option<Arc<SessionRouter>> {
        self.sessions.get(identity).map(|entry| Arc::clone(entry.value()))
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop the session registered for `identity`.
    pub fn evict(&self, identity: &str) -> Option<Arc<SessionRouter>> {
        let (_, router) = self.sessions.remove(identity)?;
        info!("Evicted session {}", router.id());
        Some(router)
    }

    fn session_for(&self, identity: &str) -> Result<Arc<SessionRouter>, RouterError> {
        match self.sessions.entry(identity.to_string()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let router = self.template.copy().with_components((self.factory)())?;
                let router = Arc::new(router);
                info!("Created session {}", router.id());
                entry.insert(Arc::clone(&router));
                Ok(router)
            }
        }
    }

    fn timeout_callback(&self, identity: String, router: &Arc<SessionRouter>) -> TimeoutCallback {
        let sessions = Arc::clone(&self.sessions);
        let strategy = self.strategy.clone();
        let router = Arc::downgrade(router);
        Arc::new(move |event, active_component| {
            if let Some(router) = router.upgrade() {
                strategy.apply(&sessions, &identity, router, event, active_component);
            }
        })
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
