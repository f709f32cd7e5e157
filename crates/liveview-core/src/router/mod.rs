//! Session router.
//!
//! A [`SessionRouter`] belongs to one session identity. It owns the
//! session's components, knows which one is active, remembers the
//! connection the session is currently bound to and runs the inactivity
//! watchdog.
//!
//! ## States
//!
//! A router starts unrouted. The first successful [`SessionRouter::navigate`]
//! activates a component; later navigations always clean up the active
//! component before looking up the next one, so at most one component is
//! ever active.

mod handler;
mod route;
mod watchdog;

pub use handler::{EventHandler, ForwardToActive, LiveNavigation, SessionGuard};
pub use route::{Route, parse_route};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use liveview_protocols::{
    ClientEvent, ConnectionError, ConnectionHandle, RoutableComponent, ServerCommand,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::RouterError;
use watchdog::PendingTimer;

/// Shared handle to a routable component.
pub type ComponentHandle = Arc<dyn RoutableComponent>;

/// Renders the markup sent when navigation hits an unknown path.
pub type FallbackTemplate = Arc<dyn Fn() -> String + Send + Sync>;

/// Called once when a session's inactivity timer elapses, with the event
/// that started it and the component active at that moment. The event is
/// `None` when the timer was armed by a connection attaching.
pub type TimeoutCallback =
    Arc<dyn Fn(Option<ClientEvent>, Option<ComponentHandle>) + Send + Sync>;

/// Navigation configuration shared by a template router and its copies.
#[derive(Clone)]
struct RouterSettings {
    fallback: Option<FallbackTemplate>,
    handler: Arc<dyn EventHandler>,
}

/// Mutable session state, only reachable through the session lock.
#[derive(Default)]
pub(crate) struct RouterState {
    components: Vec<ComponentHandle>,
    active: Option<usize>,
    connection: Option<ConnectionHandle>,
    timer: Option<PendingTimer>,
    generation: u64,
}

impl RouterState {
    fn active_component(&self) -> Option<ComponentHandle> {
        self.active.and_then(|index| self.components.get(index).cloned())
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.components.iter().position(|c| c.path() == path)
    }
}

/// Per-session router.
pub struct SessionRouter {
    id: Uuid,
    settings: Arc<RouterSettings>,
    state: Mutex<RouterState>,
}

impl SessionRouter {
    /// Create an unrouted router that forwards events to the active
    /// component and has no fallback template.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            settings: Arc::new(RouterSettings {
                fallback: None,
                handler: Arc::new(ForwardToActive),
            }),
            state: Mutex::new(RouterState::default()),
        }
    }

    /// Markup to send instead of failing when navigation hits an unknown
    /// path or an unparseable URL.
    pub fn with_fallback_template<F>(mut self, fallback: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Arc::make_mut(&mut self.settings).fallback = Some(Arc::new(fallback));
        self
    }

    pub fn with_event_handler(mut self, handler: impl EventHandler + 'static) -> Self {
        Arc::make_mut(&mut self.settings).handler = Arc::new(handler);
        self
    }

    /// Install the session's components. Paths must be unique.
    pub fn with_components(
        mut self,
        components: Vec<ComponentHandle>,
    ) -> Result<Self, RouterError> {
        let mut seen = HashSet::new();
        for component in &components {
            if !seen.insert(component.path()) {
                return Err(RouterError::DuplicatePath(component.path().to_string()));
            }
        }
        self.state.get_mut().components = components;
        Ok(self)
    }

    /// A fresh unrouted router with a new id, sharing this router's fallback
    /// template and event handler but none of its components.
    pub fn copy(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            settings: Arc::clone(&self.settings),
            state: Mutex::new(RouterState::default()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn active_path(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .active_component()
            .map(|c| c.path().to_string())
    }

    pub async fn component_paths(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.components.iter().map(|c| c.path().to_string()).collect()
    }

    pub async fn bound_connection(&self) -> Option<ConnectionHandle> {
        self.state.lock().await.connection.clone()
    }

    /// Render the active component's base template.
    pub async fn render(&self) -> Result<String, RouterError> {
        let component = self
            .state
            .lock()
            .await
            .active_component()
            .ok_or(RouterError::NoActiveComponent)?;
        Ok(component.base_template().await?)
    }

    /// Navigate to `url` and push the new page to the bound connection.
    pub async fn navigate(&self, url: &str) -> Result<(), RouterError> {
        let mut state = self.state.lock().await;
        let target = state.connection.clone();
        self.navigate_locked(&mut state, url, target).await
    }

    /// Bind `connection` as the session's transport, hand it to every
    /// component, then navigate to `initial_url`.
    pub async fn attach(
        &self,
        connection: ConnectionHandle,
        initial_url: &str,
    ) -> Result<(), RouterError> {
        let mut state = self.state.lock().await;
        state.connection = Some(Arc::clone(&connection));
        for component in &state.components {
            component.bind_connection(Some(Arc::clone(&connection)));
        }
        debug!("Session {} bound to connection {}", self.id, connection.id());
        self.navigate_locked(&mut state, initial_url, Some(connection))
            .await
    }

    /// Restart the inactivity timer without an event, e.g. when a
    /// connection attaches. A session nobody talks to still expires.
    pub async fn restart_timeout(
        self: &Arc<Self>,
        inactivity_interval: Duration,
        on_timeout: TimeoutCallback,
    ) {
        let mut state = self.state.lock().await;
        self.restart_timer(&mut state, None, inactivity_interval, on_timeout);
    }

    /// Run the event handler for `event` and restart the inactivity timer.
    ///
    /// `from` is the connection the event arrived on; the handler replies to
    /// it. Component failures are logged and never abort the timer restart.
    pub async fn dispatch(
        self: &Arc<Self>,
        event: ClientEvent,
        from: ConnectionHandle,
        inactivity_interval: Duration,
        on_timeout: TimeoutCallback,
    ) {
        let mut state = self.state.lock().await;
        state.timer = None;

        debug!(
            "Dispatching {} in session {} from connection {}",
            event.action,
            self.id,
            from.id()
        );
        let handler = Arc::clone(&self.settings.handler);
        {
            let mut session = SessionGuard {
                router: self,
                state: &mut *state,
                connection: from,
            };
            handler.handle(&mut session, &event).await;
        }

        self.restart_timer(&mut state, Some(event), inactivity_interval, on_timeout);
    }

    fn restart_timer(
        self: &Arc<Self>,
        state: &mut RouterState,
        event: Option<ClientEvent>,
        interval: Duration,
        on_timeout: TimeoutCallback,
    ) {
        state.generation += 1;
        state.timer = Some(PendingTimer::start(
            Arc::downgrade(self),
            state.generation,
            interval,
            event,
            on_timeout,
        ));
    }

    /// Called by the watchdog task once its interval has elapsed.
    pub(crate) async fn fire_timeout(
        &self,
        generation: u64,
        event: Option<ClientEvent>,
        on_timeout: TimeoutCallback,
    ) {
        let mut state = self.state.lock().await;
        if !state.timer.as_ref().is_some_and(|t| t.is_current(generation)) {
            debug!("Superseded inactivity timer in session {} ignored", self.id);
            return;
        }
        state.timer = None;

        info!("Session {} inactive, applying close strategy", self.id);
        on_timeout(event, state.active_component());
    }

    /// Navigate under the session lock. The new page goes to `target`.
    async fn navigate_locked(
        &self,
        state: &mut RouterState,
        url: &str,
        target: Option<ConnectionHandle>,
    ) -> Result<(), RouterError> {
        if let Some(active) = state.active_component() {
            active.clean_up(self.id);
        }

        let route = match parse_route(url) {
            Ok(route) => route,
            Err(e) => return self.fall_back(target.as_ref(), e).await,
        };
        let Some(index) = state.position(&route.path) else {
            let error = RouterError::NoMatchingPath(route.path);
            return self.fall_back(target.as_ref(), error).await;
        };

        let component = Arc::clone(&state.components[index]);
        component.set_query_parameters(route.query, self.id);
        state.active = Some(index);

        let html = component.base_template().await?;
        send_to(target.as_ref(), &ServerCommand::replace_body(html)).await;
        info!("Session {} navigated to {}", self.id, route.path);
        Ok(())
    }

    async fn fall_back(
        &self,
        target: Option<&ConnectionHandle>,
        error: RouterError,
    ) -> Result<(), RouterError> {
        let Some(fallback) = self.settings.fallback.as_ref().filter(|_| error.is_recoverable())
        else {
            return Err(error);
        };
        info!("Session {} serving fallback page: {}", self.id, error);
        send_to(target, &ServerCommand::replace_body(fallback())).await;
        Ok(())
    }
}

impl Default for SessionRouter {
    fn default() -> Self {
        Self::new()
    }
}

async fn send_to(connection: Option<&ConnectionHandle>, command: &ServerCommand) {
    let Some(connection) = connection else {
        debug!("No connection bound, dropping {}", command.action.tag());
        return;
    };
    match connection.send_command(command).await {
        Ok(()) => {}
        Err(ConnectionError::Closed) => {
            warn!(
                "Connection {} closed before {} could be sent",
                connection.id(),
                command.action.tag()
            );
        }
        Err(e) => {
            warn!("Failed to send {} to {}: {}", command.action.tag(), connection.id(), e);
        }
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
