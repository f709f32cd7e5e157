//! Error types for session routing and authentication.

use liveview_protocols::{ComponentError, ConnectionError};
use thiserror::Error;

/// Session token errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing session token")]
    Missing,

    #[error("Invalid session token: {0}")]
    Invalid(String),

    #[error("Session token expired")]
    Expired,

    #[error("Key setup failed: {0}")]
    KeySetup(String),

    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Session router errors.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("No component matches path: {0}")]
    NoMatchingPath(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("No active component")]
    NoActiveComponent,

    #[error("Duplicate component path: {0}")]
    DuplicatePath(String),

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Transport error: {0}")]
    Transport(#[from] ConnectionError),
}

impl RouterError {
    /// Whether the invalid-path fallback template may answer this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RouterError::NoMatchingPath(_) | RouterError::InvalidUrl { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert!(AuthError::Missing.to_string().contains("Missing"));
        assert!(AuthError::Expired.to_string().contains("expired"));
        let err = AuthError::Invalid("bad signature".to_string());
        assert!(err.to_string().contains("bad signature"));
    }

    #[test]
    fn test_no_matching_path_display() {
        let err = RouterError::NoMatchingPath("/nowhere".to_string());
        assert!(err.to_string().contains("/nowhere"));
    }

    #[test]
    fn test_invalid_url_display() {
        let err = RouterError::InvalidUrl {
            url: "http://[".to_string(),
            reason: "invalid IPv6 address".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("http://["));
        assert!(display.contains("IPv6"));
    }

    #[test]
    fn test_from_component_error() {
        let err: RouterError = ComponentError::RenderFailed("boom".to_string()).into();
        assert!(matches!(err, RouterError::Component(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_from_connection_error() {
        let err: RouterError = ConnectionError::Closed.into();
        assert!(matches!(err, RouterError::Transport(ConnectionError::Closed)));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(RouterError::NoMatchingPath("/x".to_string()).is_recoverable());
        assert!(
            RouterError::InvalidUrl {
                url: String::new(),
                reason: String::new()
            }
            .is_recoverable()
        );
        assert!(!RouterError::NoActiveComponent.is_recoverable());
        assert!(!RouterError::DuplicatePath("/a".to_string()).is_recoverable());
    }
}
