//! Core business entities.
//!
//! - [`Link`] - a stored short code to long URL mapping
//! - [`NewLink`] - input for creating a mapping
//! - [`LinkPatch`] - partial update of a mapping
//! - [`RateLimitCounter`] - per-client fixed-window request counter

pub mod link;
pub mod rate_limit_counter;

pub use link::{Link, LinkPatch, NewLink};
pub use rate_limit_counter::RateLimitCounter;
