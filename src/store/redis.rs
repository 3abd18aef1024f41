use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use super::{CounterStore, StoreError};
use crate::error::AppError;

/// Redis-backed counter store. INCR / PEXPIRE / PTTL over a shared
/// connection manager, which reconnects on its own after failures.
#[derive(Clone)]
pub struct RedisCounterStore {
    manager: ConnectionManager,
}

impl RedisCounterStore {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("invalid REDIS_URL: {err}")))?;

        let manager = ConnectionManager::new(client).await.map_err(|err| {
            AppError::internal(format!("unable to initialize Redis connection manager: {err}"))
        })?;

        Ok(Self { manager })
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::unavailable(err.to_string())
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.manager.clone();
        let count: u64 = conn.incr(key, 1u64).await?;
        Ok(count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: bool = conn.pexpire(key, ttl.as_millis() as i64).await?;
        Ok(())
    }

    async fn ttl_ms(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.manager.clone();
        let ttl: i64 = conn.pttl(key).await?;
        Ok(ttl)
    }
}
