//! Repository trait definitions.
//!
//! Traits define the storage contract; implementations live in
//! [`crate::infrastructure::persistence`]. Mocks are generated with
//! `mockall` for unit tests.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
