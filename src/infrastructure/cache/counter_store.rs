//! Counter store trait for rate limiting.

use super::service::CacheResult;
use crate::domain::entities::RateLimitCounter;
use async_trait::async_trait;
use std::time::Duration;

/// Expiring per-key counter storage with atomic primitives.
///
/// Both operations must be atomic per key, and keys must not contend with
/// each other; a single mutex serializing all clients is not an acceptable
/// implementation. Expiry is enforced at access time: an expired counter is
/// indistinguishable from an absent one, so a read can never observe a stale
/// window.
///
/// The limiter composes these two primitives into its check-then-increment
/// sequence; see
/// [`crate::application::services::RateLimitService::check_and_increment`].
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Returns the live counter for `key`, atomically installing a fresh
    /// `count = 0` counter expiring at `now + ttl` if none exists.
    ///
    /// Creation and expiry-setting are a single atomic step: two concurrent
    /// first requests for the same key observe the same window.
    async fn get_or_create(&self, key: &str, ttl: Duration) -> CacheResult<RateLimitCounter>;

    /// Sets the counter for `key` to `new` only if its current value is
    /// `expected` and the window is still live. The window expiry is
    /// preserved, never reset.
    ///
    /// Returns `false` when the swap lost a race (count moved, or the entry
    /// expired or vanished); the caller re-reads and retries.
    async fn compare_and_swap(&self, key: &str, expected: u32, new: u32) -> CacheResult<bool>;
}
