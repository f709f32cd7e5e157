//! Test doubles shared by the router and registry tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use liveview_protocols::{
    ClientEvent, ComponentError, Connection, ConnectionError, ConnectionHandle, QueryParameters,
    RoutableComponent, ServerCommand,
};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::auth::Authenticator;
use crate::error::AuthError;

/// Ordered log of component calls across all components of a test.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) struct RecordingConnection {
    id: String,
    closed: AtomicBool,
    sent: Mutex<Vec<String>>,
}

impl RecordingConnection {
    pub(crate) fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            closed: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn commands(&self) -> Vec<ServerCommand> {
        self.sent
            .lock()
            .iter()
            .map(|text| ServerCommand::decode(text).unwrap())
            .collect()
    }

    pub(crate) fn handle(self: &Arc<Self>) -> ConnectionHandle {
        self.clone()
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn send_text(&self, text: String) -> Result<(), ConnectionError> {
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }
        self.sent.lock().push(text);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Component that records every call into a shared [`CallLog`].
pub(crate) struct ScriptedComponent {
    path: String,
    template: String,
    log: CallLog,
    fail_render: bool,
    fail_events: bool,
    stall_events: bool,
    pub(crate) parameters: Mutex<HashMap<Uuid, QueryParameters>>,
    pub(crate) events: Mutex<Vec<ClientEvent>>,
    pub(crate) bound: Mutex<Option<String>>,
}

impl ScriptedComponent {
    pub(crate) fn new(path: &str, log: &CallLog) -> Self {
        Self {
            path: path.to_string(),
            template: format!("<main>{path}</main>"),
            log: log.clone(),
            fail_render: false,
            fail_events: false,
            stall_events: false,
            parameters: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            bound: Mutex::new(None),
        }
    }

    pub(crate) fn failing_render(mut self) -> Self {
        self.fail_render = true;
        self
    }

    pub(crate) fn failing_events(mut self) -> Self {
        self.fail_events = true;
        self
    }

    /// `receive_event` never returns.
    pub(crate) fn stalling(mut self) -> Self {
        self.stall_events = true;
        self
    }

    pub(crate) fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn parameter(&self, router_id: Uuid, key: &str) -> Option<String> {
        self.parameters.lock().get(&router_id)?.get(key).cloned()
    }
}

#[async_trait]
impl RoutableComponent for ScriptedComponent {
    fn path(&self) -> &str {
        &self.path
    }

    async fn base_template(&self) -> Result<String, ComponentError> {
        self.log.lock().push(format!("render:{}", self.path));
        if self.fail_render {
            return Err(ComponentError::RenderFailed(self.path.clone()));
        }
        Ok(self.template.clone())
    }

    fn set_query_parameters(&self, parameters: QueryParameters, router_id: Uuid) {
        self.log.lock().push(format!("set_query_parameters:{}", self.path));
        self.parameters.lock().insert(router_id, parameters);
    }

    fn clean_up(&self, router_id: Uuid) {
        self.log.lock().push(format!("clean_up:{}", self.path));
        self.parameters.lock().remove(&router_id);
    }

    fn bind_connection(&self, connection: Option<ConnectionHandle>) {
        *self.bound.lock() = connection.map(|c| c.id().to_string());
    }

    async fn receive_event(
        &self,
        connection: &ConnectionHandle,
        event: &ClientEvent,
    ) -> Result<(), ComponentError> {
        self.log.lock().push(format!("receive_event:{}", self.path));
        self.events.lock().push(event.clone());
        if self.stall_events {
            std::future::pending::<()>().await;
        }
        if self.fail_events {
            return Err(ComponentError::EventFailed(self.path.clone()));
        }
        let reply = event.value.clone().unwrap_or_default();
        self.send_command(&**connection, &ServerCommand::update_node_value("#out", reply))
            .await;
        Ok(())
    }
}

/// Accepts a fixed set of tokens.
pub(crate) struct StaticAuthenticator {
    tokens: HashSet<String>,
}

impl StaticAuthenticator {
    pub(crate) fn new(tokens: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        })
    }
}

impl Authenticator for StaticAuthenticator {
    fn authenticate(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }
        if self.tokens.contains(token) {
            Ok(())
        } else {
            Err(AuthError::Invalid(token.to_string()))
        }
    }
}

/// Serialize a client event the way the browser client does.
pub(crate) fn event_json(action: &str, value: Option<&str>, token: &str) -> String {
    let mut event = ClientEvent::new(action, token);
    event.value = value.map(str::to_string);
    event.encode().unwrap()
}
