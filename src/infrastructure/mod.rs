//! Infrastructure layer: concrete storage and cache implementations.
//!
//! - [`cache`] - redirect cache (Redis / no-op) and rate-limit counter store
//! - [`persistence`] - PostgreSQL repositories

pub mod cache;
pub mod persistence;
