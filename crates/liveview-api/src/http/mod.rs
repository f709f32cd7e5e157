//! HTTP endpoints.

pub mod handlers;
pub mod routes;
