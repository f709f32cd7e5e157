//! Routable component errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Data unavailable: {0}")]
    Unavailable(String),

    #[error("Event handling failed: {0}")]
    EventFailed(String),

    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("{0}")]
    Custom(String),
}
