//! Error types for the LiveView protocol layer.

mod component;
mod connection;
mod protocol;

pub use component::*;
pub use connection::*;
pub use protocol::*;
