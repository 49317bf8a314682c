//! In-process counter store backed by a concurrent hash map.

use super::counter_store::CounterStore;
use super::service::CacheResult;
use crate::domain::entities::RateLimitCounter;
use crate::utils::clock::Clock;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Sweep expired entries after this many operations.
const PURGE_INTERVAL: u64 = 4096;

/// DashMap-backed [`CounterStore`].
///
/// Atomicity per key comes from DashMap's shard locking: `entry` and
/// `get_mut` hold the shard lock for the duration of the read-modify-write,
/// so same-key operations serialize while unrelated clients proceed in
/// parallel.
///
/// Expired entries are invisible immediately (checked under the shard lock
/// on every access) and their memory is reclaimed either on the next touch
/// of the same key or by an amortized sweep every [`PURGE_INTERVAL`]
/// operations.
pub struct MemoryCounterStore {
    entries: DashMap<String, RateLimitCounter>,
    clock: Arc<dyn Clock>,
    ops: AtomicU64,
}

impl MemoryCounterStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            ops: AtomicU64::new(0),
        }
    }

    /// Number of tracked keys, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn maybe_purge(&self) {
        if self.ops.fetch_add(1, Ordering::Relaxed) % PURGE_INTERVAL != PURGE_INTERVAL - 1 {
            return;
        }
        let now = self.clock.now();
        self.entries.retain(|_, counter| !counter.is_expired_at(now));
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get_or_create(&self, key: &str, ttl: Duration) -> CacheResult<RateLimitCounter> {
        self.maybe_purge();

        let now = self.clock.now();
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| RateLimitCounter::new(now + ttl));

        // An expired window is treated as absent and replaced in the same
        // locked access, so no reader ever sees the stale counter.
        if entry.is_expired_at(now) {
            *entry = RateLimitCounter::new(now + ttl);
        }

        Ok(*entry)
    }

    async fn compare_and_swap(&self, key: &str, expected: u32, new: u32) -> CacheResult<bool> {
        self.maybe_purge();

        let now = self.clock.now();
        match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired_at(now) && entry.count == expected => {
                entry.count = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
