//! Event dispatch handlers.

use async_trait::async_trait;
use liveview_protocols::{ClientAction, ClientEvent, ConnectionHandle, ServerCommand};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ComponentHandle, RouterState, SessionRouter};
use crate::error::RouterError;

/// Locked view of one session, handed to an [`EventHandler`].
///
/// Holding a `SessionGuard` means holding the session lock: nothing else
/// touches the session until the handler returns.
pub struct SessionGuard<'a> {
    pub(crate) router: &'a SessionRouter,
    pub(crate) state: &'a mut RouterState,
    pub(crate) connection: ConnectionHandle,
}

impl SessionGuard<'_> {
    pub fn router_id(&self) -> Uuid {
        self.router.id()
    }

    /// The connection the event arrived on.
    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    pub fn active_component(&self) -> Option<ComponentHandle> {
        self.state.active_component()
    }

    /// Navigate the session, as [`SessionRouter::navigate`] does, but send
    /// the new page to the connection the event arrived on.
    pub async fn navigate(&mut self, url: &str) -> Result<(), RouterError> {
        let target = Some(self.connection.clone());
        self.router.navigate_locked(self.state, url, target).await
    }

    /// Hand `event` to the active component.
    pub async fn forward_to_active(&mut self, event: &ClientEvent) -> Result<(), RouterError> {
        let component = self
            .state
            .active_component()
            .ok_or(RouterError::NoActiveComponent)?;
        component.receive_event(&self.connection, event).await?;
        Ok(())
    }

    /// Send a command to the connection the event arrived on.
    pub async fn send(&self, command: &ServerCommand) -> Result<(), RouterError> {
        self.connection.send_command(command).await?;
        Ok(())
    }
}

/// The step [`SessionRouter::dispatch`] runs for every client event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, session: &mut SessionGuard<'_>, event: &ClientEvent);
}

/// Forward every event to the active component.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardToActive;

#[async_trait]
impl EventHandler for ForwardToActive {
    async fn handle(&self, session: &mut SessionGuard<'_>, event: &ClientEvent) {
        forward(session, event).await;
    }
}

/// Navigate on `live-href`, forward everything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveNavigation;

#[async_trait]
impl EventHandler for LiveNavigation {
    async fn handle(&self, session: &mut SessionGuard<'_>, event: &ClientEvent) {
        if event.known_action() != Some(ClientAction::LiveHref) {
            forward(session, event).await;
            return;
        }

        let Some(target) = event.value.as_deref() else {
            warn!("Ignoring live-href without a target in session {}", session.router_id());
            return;
        };
        debug!("Session {} following link to {}", session.router_id(), target);
        if let Err(e) = session.navigate(target).await {
            warn!("Navigation to {} failed in session {}: {}", target, session.router_id(), e);
        }
    }
}

async fn forward(session: &mut SessionGuard<'_>, event: &ClientEvent) {
    match session.forward_to_active(event).await {
        Ok(()) => {}
        Err(RouterError::NoActiveComponent) => {
            warn!("Dropping event for session {}: no active component", session.router_id());
        }
        Err(e) => {
            warn!("Component failed to handle event in session {}: {}", session.router_id(), e);
        }
    }
}
