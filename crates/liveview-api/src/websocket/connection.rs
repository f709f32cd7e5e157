//! Channel-backed connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use liveview_protocols::{Connection, ConnectionError};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Frames queued for the socket writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outbound {
    Text(String),
    Close,
}

/// Outbound frames buffered per connection.
pub(crate) const OUTBOUND_BUFFER: usize = 100;

/// A WebSocket connection as seen by the session layer.
pub struct WsConnection {
    id: String,
    closed: AtomicBool,
    tx: mpsc::Sender<Outbound>,
}

impl WsConnection {
    pub(crate) fn new(tx: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            closed: AtomicBool::new(false),
            tx,
        })
    }
}

#[async_trait]
impl Connection for WsConnection {
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
        self.tx.send(Outbound::Text(text)).await.map_err(|_| {
            self.closed.store(true, Ordering::SeqCst);
            ConnectionError::Closed
        })
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.tx.send(Outbound::Close).await;
    }
}
