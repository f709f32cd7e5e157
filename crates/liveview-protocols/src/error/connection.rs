//! Transport connection errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Encode failed: {0}")]
    Encode(String),
}
