//! Utility functions shared across the application.
//!
//! - [`code_generator`] - Unique short code generation
//! - [`url_validator`] - Long URL validation
//! - [`clock`] - Injectable time source

pub mod clock;
pub mod code_generator;
pub mod url_validator;
