//! Wire protocol errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Failed to decode client event: {0}")]
    Decode(String),

    #[error("Failed to encode server command: {0}")]
    Encode(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}
