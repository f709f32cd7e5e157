//! Server -> client DOM mutation commands.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// A single DOM mutation sent to the browser.
///
/// `value` carries the markup, text or style payload the action applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCommand {
    pub value: String,
    pub action: CommandAction,
}

/// Tagged mutation. Encodes with exactly one key, e.g.
/// `{"insertNode":{"target":"list"}}` or `{"replaceBody":{}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandAction {
    Remove { selector: String },
    SetTitle { title: String },
    InsertNode { target: String },
    ReplaceBody {},
    AppendNode { target: String },
    AddAttribute { target: String, attributes: Vec<NodeAttribute> },
    RemoveAttribute { target: String, attributes: Vec<NodeAttribute> },
    UpdateAttribute { target: String, attributes: Vec<NodeAttribute> },
    AddStyle {},
    AddStyleTo { target: String },
    RemoveStyle { target: String },
    SetInput { target: String },
    UpdateNodeValue { target: String },
}

impl CommandAction {
    /// Wire tag of this action.
    pub fn tag(&self) -> &'static str {
        match self {
            CommandAction::Remove { .. } => "remove",
            CommandAction::SetTitle { .. } => "setTitle",
            CommandAction::InsertNode { .. } => "insertNode",
            CommandAction::ReplaceBody {} => "replaceBody",
            CommandAction::AppendNode { .. } => "appendNode",
            CommandAction::AddAttribute { .. } => "addAttribute",
            CommandAction::RemoveAttribute { .. } => "removeAttribute",
            CommandAction::UpdateAttribute { .. } => "updateAttribute",
            CommandAction::AddStyle {} => "addStyle",
            CommandAction::AddStyleTo { .. } => "addStyleTo",
            CommandAction::RemoveStyle { .. } => "removeStyle",
            CommandAction::SetInput { .. } => "setInput",
            CommandAction::UpdateNodeValue { .. } => "updateNodeValue",
        }
    }
}

/// One `name="value"` pair of an element attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttribute {
    pub name: String,
    pub value: String,
}

impl NodeAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl ServerCommand {
    pub fn new(value: impl Into<String>, action: CommandAction) -> Self {
        Self {
            value: value.into(),
            action,
        }
    }

    /// Replace the whole document body with `html`.
    pub fn replace_body(html: impl Into<String>) -> Self {
        Self::new(html, CommandAction::ReplaceBody {})
    }

    /// Replace the content of element `target` with `html`.
    pub fn insert_node(target: impl Into<String>, html: impl Into<String>) -> Self {
        Self::new(html, CommandAction::InsertNode { target: target.into() })
    }

    pub fn append_node(target: impl Into<String>, html: impl Into<String>) -> Self {
        Self::new(html, CommandAction::AppendNode { target: target.into() })
    }

    pub fn remove(selector: impl Into<String>) -> Self {
        Self::new("", CommandAction::Remove { selector: selector.into() })
    }

    pub fn set_title(title: impl Into<String>) -> Self {
        let title = title.into();
        Self::new(title.clone(), CommandAction::SetTitle { title })
    }

    pub fn add_attribute(target: impl Into<String>, attributes: Vec<NodeAttribute>) -> Self {
        Self::new(
            "",
            CommandAction::AddAttribute {
                target: target.into(),
                attributes,
            },
        )
    }

    pub fn remove_attribute(target: impl Into<String>, attributes: Vec<NodeAttribute>) -> Self {
        Self::new(
            "",
            CommandAction::RemoveAttribute {
                target: target.into(),
                attributes,
            },
        )
    }

    pub fn update_attribute(target: impl Into<String>, attributes: Vec<NodeAttribute>) -> Self {
        Self::new(
            "",
            CommandAction::UpdateAttribute {
                target: target.into(),
                attributes,
            },
        )
    }

    /// Add a global stylesheet; `css` is the stylesheet text.
    pub fn add_style(css: impl Into<String>) -> Self {
        Self::new(css, CommandAction::AddStyle {})
    }

    /// Apply inline styles to `target`; `style_json` is a JSON object of
    /// CSS properties.
    pub fn add_style_to(target: impl Into<String>, style_json: impl Into<String>) -> Self {
        Self::new(style_json, CommandAction::AddStyleTo { target: target.into() })
    }

    pub fn remove_style(target: impl Into<String>) -> Self {
        Self::new("", CommandAction::RemoveStyle { target: target.into() })
    }

    pub fn set_input(target: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(value, CommandAction::SetInput { target: target.into() })
    }

    pub fn update_node_value(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(text, CommandAction::UpdateNodeValue { target: target.into() })
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Decode(e.to_string()))
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
