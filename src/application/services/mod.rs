//! Business logic services.

pub mod link_service;
pub mod rate_limit_service;

pub use link_service::LinkService;
pub use rate_limit_service::{Decision, RateLimitService};
