//! Domain layer: business entities and repository contracts.
//!
//! This layer has no dependency on the web or storage layers. Repository
//! traits defined here are implemented by
//! [`crate::infrastructure::persistence`].

pub mod entities;
pub mod repositories;
