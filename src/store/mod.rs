pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemoryCounterStore;
pub use self::redis::RedisCounterStore;

/// Failure talking to the counter store. Callers treat every cause the
/// same way (the rate limiter fails open), so one variant is enough.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter store unavailable: {detail}")]
    Unavailable { detail: String },
}

impl StoreError {
    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::Unavailable {
            detail: detail.into(),
        }
    }
}

/// Keyed atomic counters with per-key TTL, shared by every service
/// instance. The store is the single source of truth for window counts;
/// the pipeline holds no counter state of its own.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment the counter at `key` and return the new value.
    /// A missing key starts at zero, so the first increment returns 1.
    async fn incr(&self, key: &str) -> Result<u64, StoreError>;

    /// Set the key's time-to-live. Idempotent; concurrent first requests
    /// may both call this for the same fresh counter.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Remaining time-to-live in milliseconds. Mirrors Redis semantics:
    /// -2 when the key is missing, -1 when it has no expiry.
    async fn ttl_ms(&self, key: &str) -> Result<i64, StoreError>;
}
