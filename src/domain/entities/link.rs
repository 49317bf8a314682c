//! Link entity representing a short code to long URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A stored URL mapping.
///
/// The short code is immutable once assigned; updates may change the target
/// URL or expiry but never the code.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: Uuid,
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub hit_count: i64,
    /// IP address of the creator, when known.
    pub owner_ip: Option<String>,
}

impl Link {
    /// Returns true if the link is past its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the link is past its expiry.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Seconds until expiry, if an expiry is set and still in the future.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at
            .map(|e| (e - now).num_seconds().max(0) as u64)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_ip: Option<String>,
}

/// Partial update for an existing link.
///
/// `None` fields keep the stored value.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub long_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}
