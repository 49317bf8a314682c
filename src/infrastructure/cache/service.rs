//! Cache trait and error types.

use async_trait::async_trait;

/// Errors from cache backends.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache for resolved redirects, keyed by short code.
///
/// Implementations are fail-open: a broken cache degrades to database
/// lookups and must never fail a redirect.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached long URL for `code`, or `None` on miss.
    ///
    /// Backend errors are logged and reported as a miss.
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Caches `long_url` under `code` for `ttl_seconds`.
    ///
    /// Callers cap the TTL at the link's expiry so an expired link can never
    /// be served from cache. Backend errors are logged and swallowed.
    async fn set_url(&self, code: &str, long_url: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Drops the cached entry for `code` (after update or delete).
    async fn invalidate(&self, code: &str) -> CacheResult<()>;

    /// True if the backend answers a health probe.
    async fn health_check(&self) -> bool;
}
