//! Redis-backed store.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::cache::key::CacheKey;
use crate::cache::store::{CacheStore, StoreResult};

/// Store backed by a Redis server through a reconnecting connection manager.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open a connection to `url`. Fails if the server cannot be reached.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!(redis_url = %url, "Connected to Redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn exists(&self, key: &CacheKey) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(key.as_str()).await?;
        Ok(exists)
    }

    async fn get(&self, key: &CacheKey) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key.as_str()).await?;
        Ok(value)
    }

    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        // Redis rejects EX 0.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key.as_str(), value, seconds).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::StoreError;

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let result = RedisStore::connect("definitely not a redis url").await;
        assert!(matches!(result, Err(StoreError::Redis(_))));
    }
}
