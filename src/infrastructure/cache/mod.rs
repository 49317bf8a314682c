//! Caching layer.
//!
//! Two independent concerns share this module:
//!
//! - [`CacheService`] - redirect lookup cache (Redis in production,
//!   [`NullCache`] when disabled), fail-open
//! - [`CounterStore`] - atomic expiring counters backing the rate limiter
//!   ([`MemoryCounterStore`] in-process), fail-closed at the caller

mod counter_store;
mod memory_counter_store;
mod null_cache;
mod redis_cache;
mod service;

pub use counter_store::CounterStore;
pub use memory_counter_store::MemoryCounterStore;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
