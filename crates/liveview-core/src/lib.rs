//! # LiveView Core
//!
//! Session routing and connection bookkeeping for LiveView.
//!
//! ## Components
//!
//! - [`ConnectionRegistry`] - Maps session identities to session routers and
//!   tracks live connections
//! - [`SessionRouter`] - Resolves in-session URLs to one active component and
//!   dispatches client events to it
//! - [`EventHandler`] - Pluggable dispatch step run under the session lock
//! - [`Authenticator`] - Session token verification, with a JWT implementation
//!
//! ## Concurrency
//!
//! Each session router owns an async mutex. Everything that touches one
//! session (navigation, dispatch, the inactivity watchdog firing) runs under
//! it, so events for one identity are applied in arrival order while
//! different sessions proceed independently.

pub mod auth;
pub mod error;
pub mod registry;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{Authenticator, JwtAuthenticator, SessionClaims, TokenIssuer};
pub use error::{AuthError, RouterError};
pub use registry::{
    CloseStrategy, ComponentFactory, ConnectionCreatedHook, ConnectionRegistry, SwapCompletion,
    SwappedSession,
};
pub use router::{
    ComponentHandle, EventHandler, FallbackTemplate, ForwardToActive, LiveNavigation, Route,
    SessionGuard, SessionRouter, TimeoutCallback, parse_route,
};
