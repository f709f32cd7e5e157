//! Wire messages exchanged over a LiveView connection.
//!
//! Both directions are flat JSON objects, one message per text frame.

mod client;
mod server;

pub use client::{ClientAction, ClientEvent};
pub use server::{CommandAction, NodeAttribute, ServerCommand};
