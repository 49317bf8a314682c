//! Repository trait for link storage.

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage contract for URL mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - `MockLinkRepository` under `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the code is already taken (the
    /// unique index is the final arbiter for concurrent inserts of the same
    /// code). Returns [`AppError::Internal`] on other database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Looks up a link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Looks up a link by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Link>, AppError>;

    /// Uniqueness oracle for the code generator: true if `code` is taken.
    ///
    /// Reflects all committed codes; read-after-write consistency is
    /// whatever the database provides.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Lists links, newest first. `page` is 1-indexed.
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<Link>, AppError>;

    /// Total number of stored links.
    async fn count(&self) -> Result<i64, AppError>;

    /// Applies a partial update; `None` fields keep the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    async fn update(&self, id: Uuid, patch: LinkPatch) -> Result<Link, AppError>;

    /// Deletes a link. Returns `false` when nothing matched.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Atomically increments the hit counter for `code`.
    async fn record_hit(&self, code: &str) -> Result<(), AppError>;
}
