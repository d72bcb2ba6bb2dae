//! Key-value store seam for cached responses.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::key::CacheKey;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// The three operations the cache pipeline needs from a key-value store.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether a live entry exists for `key`.
    async fn exists(&self, key: &CacheKey) -> StoreResult<bool>;

    /// The stored value, if any.
    async fn get(&self, key: &CacheKey) -> StoreResult<Option<String>>;

    /// Store `value`, replacing any previous entry, expiring after `ttl`.
    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> StoreResult<()>;
}
