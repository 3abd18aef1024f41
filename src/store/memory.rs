use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CounterStore, StoreError};

#[derive(Debug)]
struct CounterEntry {
    count: u64,
    deadline: Option<Instant>,
}

impl CounterEntry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if deadline <= now)
    }
}

/// Single-process counter store for development and tests. Entries expire
/// lazily on access, which matches the limiter's access pattern: a key is
/// only interesting while requests keep arriving for it.
#[derive(Default)]
pub struct MemoryCounterStore {
    entries: Mutex<HashMap<String, CounterEntry>>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let entry = entries.entry(key.to_string()).or_insert(CounterEntry {
            count: 0,
            deadline: None,
        });
        if entry.is_expired(now) {
            entry.count = 0;
            entry.deadline = None;
        }
        entry.count += 1;
        Ok(entry.count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.deadline = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn ttl_ms(&self, key: &str) -> Result<i64, StoreError> {
        let now = Instant::now();
        let entries = self.entries.lock();

        match entries.get(key) {
            None => Ok(-2),
            Some(entry) if entry.is_expired(now) => Ok(-2),
            Some(entry) => match entry.deadline {
                None => Ok(-1),
                Some(deadline) => Ok(deadline.duration_since(now).as_millis() as i64),
            },
        }
    }
}
