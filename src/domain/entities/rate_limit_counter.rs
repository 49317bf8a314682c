//! Per-client request counter for the fixed rate-limit window.

use chrono::{DateTime, Utc};

/// Snapshot of a client's counter within the current window.
///
/// The counter is owned exclusively by the counter store; at most one live
/// counter exists per client at any instant, and an expired counter is never
/// visible to reads. `window_expires_at` is fixed when the window is created
/// and never moves on increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitCounter {
    /// Requests observed so far in the current window.
    pub count: u32,
    /// Absolute end of the current window.
    pub window_expires_at: DateTime<Utc>,
}

impl RateLimitCounter {
    /// A fresh counter for a window ending at `window_expires_at`.
    pub fn new(window_expires_at: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            window_expires_at,
        }
    }

    /// Returns true if the window has ended at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.window_expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fresh_counter_starts_at_zero() {
        let counter = RateLimitCounter::new(Utc::now());
        assert_eq!(counter.count, 0);
    }

    #[test]
    fn test_expiry_is_inclusive_at_the_boundary() {
        let now = Utc::now();
        let counter = RateLimitCounter::new(now);
        assert!(counter.is_expired_at(now));
        assert!(!counter.is_expired_at(now - Duration::seconds(1)));
    }
}
