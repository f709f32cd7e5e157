//! Transport connection abstraction.
//!
//! The session router and registry never touch sockets directly; they talk
//! to a [`Connection`], which the transport layer (or a test double)
//! implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConnectionError;
use crate::message::ServerCommand;

/// Shared handle to a live connection.
pub type ConnectionHandle = Arc<dyn Connection>;

/// A live, bidirectional connection to one browser tab.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Unique connection ID, stable for the lifetime of the connection.
    fn id(&self) -> &str;

    /// Whether the connection has been closed by either side.
    fn is_closed(&self) -> bool;

    /// Queue one text frame for the client.
    async fn send_text(&self, text: String) -> Result<(), ConnectionError>;

    /// Close the connection. Closing twice is a no-op.
    async fn close(&self);

    /// Encode and send a server command.
    async fn send_command(&self, command: &ServerCommand) -> Result<(), ConnectionError> {
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }
        let text = command
            .encode()
            .map_err(|e| ConnectionError::Encode(e.to_string()))?;
        self.send_text(text).await
    }
}
