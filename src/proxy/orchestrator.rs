//! Cache-backed fetch orchestration.
//!
//! Per request:
//! ```text
//! START         filter cookies, resolve URL, classify binary
//! KEY_DERIVED   base64(url + "--" + cookies)
//! CACHE_HIT     GET → deserialize → status 200
//! CACHE_MISS    origin GET (fallback 404 on failure) → SET if status 200
//! RESPONDING    allow-listed headers, status, raw or text body
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::StatusCode;

use crate::cache::{self, CacheKey, CacheStore};
use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::request::ProxyRequest;
use crate::http::response::{CapturedResponse, ProxyResponse};
use crate::observability::metrics;
use crate::origin::{Origin, OriginReply};
use crate::proxy::classify::is_binary;
use crate::proxy::filter::ForwardingRules;
use crate::proxy::normalize::resolve_url;

/// Store handle plus the expiry applied to every write.
#[derive(Clone)]
struct StoreBinding {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

/// The request handler behind the catch-all route.
///
/// Holds only immutable configuration and shared client handles, so one
/// instance serves every request concurrently.
#[derive(Clone)]
pub struct CacheProxy {
    origin: Arc<dyn Origin>,
    store: Option<StoreBinding>,
    rules: ForwardingRules,
    base_url: String,
}

impl CacheProxy {
    /// A pass-through proxy: no store, default allow-lists.
    pub fn new(origin: Arc<dyn Origin>, base_url: impl Into<String>) -> Self {
        Self {
            origin,
            store: None,
            rules: ForwardingRules::default(),
            base_url: base_url.into(),
        }
    }

    /// Build from configuration. `store` is ignored when caching is disabled.
    pub fn from_config(
        config: &ProxyConfig,
        origin: Arc<dyn Origin>,
        store: Option<Arc<dyn CacheStore>>,
    ) -> Self {
        let proxy = Self::new(origin, config.origin.base_url.clone())
            .with_rules(ForwardingRules::from_config(&config.forwarding));
        match store {
            Some(store) if config.cache.enabled => {
                proxy.with_store(store, Duration::from_secs(config.cache.ttl_secs))
            }
            _ => proxy,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        self.store = Some(StoreBinding { store, ttl });
        self
    }

    pub fn with_rules(mut self, rules: ForwardingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn caching_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Answer one request from the store or the origin.
    pub async fn handle(&self, request: &ProxyRequest) -> Result<ProxyResponse, ProxyError> {
        let start = Instant::now();
        match self.resolve(request).await {
            Ok((status, captured, outcome)) => {
                metrics::record_response(status.as_u16(), outcome, start);
                Ok(ProxyResponse {
                    status,
                    headers: self.rules.select_response_headers(&captured.headers),
                    body: captured.body,
                })
            }
            Err(e) => {
                metrics::record_response(e.status().as_u16(), "error", start);
                Err(e)
            }
        }
    }

    async fn resolve(
        &self,
        request: &ProxyRequest,
    ) -> Result<(StatusCode, CapturedResponse, &'static str), ProxyError> {
        let cookie = self.rules.cookie_string(&request.cookies);
        let url = resolve_url(&self.base_url, &request.path, &request.query);
        let binary = is_binary(&url);

        let Some(binding) = &self.store else {
            let reply = self.fetch_origin(&url, &cookie, binary).await;
            return Ok((reply.status, reply.response, "pass"));
        };

        let key = CacheKey::derive(&url, &cookie);
        if binding.store.exists(&key).await? {
            let captured = self.replay(binding, &key, binary).await?;
            tracing::debug!(url = %url, key = %key, binary, "Cache hit");
            metrics::record_cache_hit();
            return Ok((StatusCode::OK, captured, "hit"));
        }

        tracing::debug!(url = %url, key = %key, binary, "Cache miss");
        metrics::record_cache_miss();
        let reply = self.fetch_origin(&url, &cookie, binary).await;
        if reply.status == StatusCode::OK {
            spawn_store_write(binding.clone(), key, reply.response.clone());
        }
        Ok((reply.status, reply.response, "miss"))
    }

    async fn replay(
        &self,
        binding: &StoreBinding,
        key: &CacheKey,
        binary: bool,
    ) -> Result<CapturedResponse, ProxyError> {
        let value = binding
            .store
            .get(key)
            .await?
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ProxyError::CacheCorruption {
                key: key.to_string(),
            })?;
        Ok(cache::deserialize(&value, binary)?)
    }

    async fn fetch_origin(&self, url: &str, cookie: &str, binary: bool) -> OriginReply {
        let cookie = (!cookie.is_empty()).then_some(cookie);
        match self.origin.fetch(url, cookie, binary).await {
            Ok(reply) => reply,
            Err(failure) => {
                tracing::warn!(url = %url, error = %failure, "Origin fetch failed, serving fallback");
                metrics::record_origin_failure();
                failure.into_fallback()
            }
        }
    }
}

/// Encode and store a fresh capture without holding up the response.
fn spawn_store_write(binding: StoreBinding, key: CacheKey, response: CapturedResponse) {
    tokio::spawn(async move {
        let value = match tokio::task::spawn_blocking(move || cache::serialize(&response)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                tracing::warn!(key = %key, error = %e, "Could not encode response for caching");
                metrics::record_store_error();
                return;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache encode task failed");
                metrics::record_store_error();
                return;
            }
        };

        match binding.store.set(&key, value, binding.ttl).await {
            Ok(()) => tracing::debug!(key = %key, ttl_secs = binding.ttl.as_secs(), "Response cached"),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache write failed");
                metrics::record_store_error();
            }
        }
    });
}
