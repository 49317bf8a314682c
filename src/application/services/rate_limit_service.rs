//! Fixed-window per-client rate limiting.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::cache::{CacheError, CounterStore};

/// Outcome of a rate-limit check. Denial is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

/// Fixed-window counter rate limiter.
///
/// One instance owns the per-client counters for the whole process; it is
/// constructed at startup and injected wherever a check is needed, so tests
/// can build isolated instances around their own store.
///
/// Fixed windows admit bursts at window boundaries (up to twice the limit
/// when requests straddle a boundary). That imprecision is an accepted
/// property of the algorithm, traded for a single counter per client.
pub struct RateLimitService {
    store: Arc<dyn CounterStore>,
    limit: u32,
    window: Duration,
}

impl RateLimitService {
    pub fn new(store: Arc<dyn CounterStore>, limit: u32, window: Duration) -> Self {
        Self {
            store,
            limit,
            window,
        }
    }

    /// Configured requests-per-window limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Decides whether `client_id` may make another request in the current
    /// window, incrementing its counter if so.
    ///
    /// The sequence is: fetch-or-create the window counter, deny without
    /// incrementing when the count has reached the limit, otherwise
    /// compare-and-swap the incremented count back. A CAS loss means a
    /// concurrent call for the same client won the slot; the loop re-reads
    /// and re-decides, so N concurrent calls admit exactly `limit` of them.
    /// The window expiry is set once at creation and never extended by
    /// increments; once the store evicts the entry the next call starts a
    /// fresh window.
    ///
    /// # Errors
    ///
    /// Propagates [`CacheError`] when the store fails; the caller must fail
    /// closed (treat as a denial with an error status), never allow.
    pub async fn check_and_increment(&self, client_id: &str) -> Result<Decision, CacheError> {
        loop {
            let counter = self.store.get_or_create(client_id, self.window).await?;

            if counter.count >= self.limit {
                return Ok(Decision::Denied);
            }

            if self
                .store
                .compare_and_swap(client_id, counter.count, counter.count + 1)
                .await?
            {
                return Ok(Decision::Allowed);
            }
        }
    }
}
