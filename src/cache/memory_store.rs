//! In-process store with per-entry expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::key::CacheKey;
use crate::cache::store::{CacheStore, StoreResult};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// A thread-safe store backed by `DashMap`.
///
/// Expired entries read as absent. They are dropped when read and swept
/// from the whole map on every write.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.inner.iter().filter(|e| e.value().expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_value(&self, key: &CacheKey) -> Option<String> {
        let now = Instant::now();
        let value = {
            let entry = self.inner.get(key.as_str())?;
            (entry.expires_at > now).then(|| entry.value.clone())
        };
        if value.is_none() {
            self.inner.remove_if(key.as_str(), |_, e| e.expires_at <= now);
        }
        value
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn exists(&self, key: &CacheKey) -> StoreResult<bool> {
        Ok(self.live_value(key).is_some())
    }

    async fn get(&self, key: &CacheKey) -> StoreResult<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn set(&self, key: &CacheKey, value: String, ttl: Duration) -> StoreResult<()> {
        let now = Instant::now();
        self.inner.retain(|_, e| e.expires_at > now);
        self.inner.insert(
            key.as_str().to_string(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}
