//! Data Transfer Objects for API requests and responses.
//!
//! DTOs use Serde for JSON and `validator` for input validation.

pub mod health;
pub mod links;
pub mod pagination;
