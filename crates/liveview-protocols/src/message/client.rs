//! Client -> server events.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// An interaction event sent by the browser.
///
/// `action` is user-defined: the bundled client sends one of the
/// [`ClientAction`] tags as a string, but hosts may send any JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEvent {
    /// Id of the element the event originated from.
    #[serde(default)]
    pub id: Option<String>,
    /// Value carried by the event (input text, link target, ...).
    #[serde(default)]
    pub value: Option<String>,
    pub action: Value,
    /// Session token, re-verified on every message.
    pub auth_token: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

impl ClientEvent {
    /// Create an event with a string action tag.
    pub fn new(action: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            id: None,
            value: None,
            action: Value::String(action.into()),
            auth_token: auth_token.into(),
            metadata: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Decode one inbound text frame.
    ///
    /// Missing `action`/`authToken` or a null `action` is a hard failure.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let event: ClientEvent =
            serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))?;
        if event.action.is_null() {
            return Err(ProtocolError::MissingField("action"));
        }
        Ok(event)
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// The action as a plain string tag, if it is one.
    pub fn action_tag(&self) -> Option<&str> {
        self.action.as_str()
    }

    /// The action as one of the tags the bundled client emits.
    pub fn known_action(&self) -> Option<ClientAction> {
        self.action_tag().and_then(ClientAction::parse)
    }

    /// Deserialize a host-defined structured action.
    pub fn action_as<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_value(self.action.clone()).map_err(|e| ProtocolError::Decode(e.to_string()))
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key).map(String::as_str)
    }
}

/// Action tags emitted by the bundled browser client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientAction {
    /// Link click; `value` holds the in-app URL to navigate to.
    LiveHref,
    /// Click on an element marked `live-action`.
    LiveAction,
    /// Element marked `live-load` was attached to the document.
    LiveLoad,
    /// Input value changed; `value` holds the new text.
    LiveInput,
}

impl ClientAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientAction::LiveHref => "live-href",
            ClientAction::LiveAction => "live-action",
            ClientAction::LiveLoad => "live-load",
            ClientAction::LiveInput => "live-input",
        }
    }

    /// Accepts both the attribute form (`live-href`) and the enum-constant
    /// form (`LIVE_HREF`).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().replace('_', "-").as_str() {
            "live-href" => Some(ClientAction::LiveHref),
            "live-action" => Some(ClientAction::LiveAction),
            "live-load" => Some(ClientAction::LiveLoad),
            "live-input" => Some(ClientAction::LiveInput),
            _ => None,
        }
    }
}

impl fmt::Display for ClientAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
