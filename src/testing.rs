//! Test doubles for the binary's tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use liveview_protocols::{Connection, ConnectionError, ServerCommand};
use parking_lot::Mutex;

/// Connection that keeps every command sent to it.
pub(crate) struct SinkConnection {
    closed: AtomicBool,
    sent: Mutex<Vec<ServerCommand>>,
}

impl SinkConnection {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            closed: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Drain the commands received so far.
    pub(crate) fn take(&self) -> Vec<ServerCommand> {
        std::mem::take(&mut *self.sent.lock())
    }
}

#[async_trait]
impl Connection for SinkConnection {
    fn id(&self) -> &str {
        "sink"
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn send_text(&self, text: String) -> Result<(), ConnectionError> {
        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }
        self.sent.lock().push(ServerCommand::decode(&text).unwrap());
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
