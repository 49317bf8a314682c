//! REST API layer.
//!
//! - [`dto`] - request/response shapes
//! - [`handlers`] - HTTP handlers
//! - [`middleware`] - rate limiting and request tracing
//! - [`routes`] - route composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
