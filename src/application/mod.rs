//! Application layer: business logic services.
//!
//! Services coordinate repository and cache traits and expose a clean API to
//! the HTTP handlers.

pub mod services;
