//! WebSocket transport.
//!
//! Each upgraded socket becomes a [`WsConnection`]: a channel-backed
//! [`Connection`](liveview_protocols::Connection) drained by a writer task,
//! while the handler task feeds inbound frames to the registry.

mod connection;
mod handler;

pub use connection::WsConnection;
pub use handler::{ConnectParams, ws_handler};
