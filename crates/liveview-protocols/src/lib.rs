//! # LiveView Protocols
//!
//! Wire protocol and capability contracts for LiveView sessions.
//! Contains only message shapes and trait definitions - the session router
//! and connection registry live in `liveview-core`.
//!
//! ## Core Traits
//!
//! - [`RoutableComponent`] - Server-side unit owning one URL's state
//! - [`Connection`] - A live transport connection to one browser
//!
//! ## Wire Messages
//!
//! - [`ClientEvent`] - Browser -> server interaction event
//! - [`ServerCommand`] - Server -> browser DOM mutation

pub mod component;
pub mod connection;
pub mod error;
pub mod message;

pub use component::{QueryParameters, RoutableComponent};
pub use connection::{Connection, ConnectionHandle};
pub use error::{ComponentError, ConnectionError, ProtocolError};
pub use message::{ClientAction, ClientEvent, CommandAction, NodeAttribute, ServerCommand};
