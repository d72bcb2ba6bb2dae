//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the store and build the origin client before serving
//! - Start the metrics exporter when enabled
//! - Bind the listener last, so traffic only arrives when ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::cache::{CacheStore, MemoryStore, RedisStore, StoreError};
use crate::config::{CacheConfig, ProxyConfig, StoreBackend};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::origin::{HttpOrigin, Origin};
use crate::proxy::CacheProxy;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cache store: {0}")]
    Store(#[from] StoreError),

    #[error("origin client: {0}")]
    Origin(#[from] reqwest::Error),

    #[error("metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid address '{0}'")]
    Address(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open the configured store, or `None` when caching is off.
pub async fn connect_store(config: &CacheConfig) -> Result<Option<Arc<dyn CacheStore>>, StoreError> {
    if !config.enabled {
        tracing::info!("Response caching disabled");
        return Ok(None);
    }

    let store: Arc<dyn CacheStore> = match config.backend {
        StoreBackend::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-process cache store; entries are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(Some(store))
}

/// Wire store, origin client and allow-lists into a pipeline.
pub async fn build_proxy(config: &ProxyConfig) -> Result<CacheProxy, StartupError> {
    let store = connect_store(&config.cache).await?;
    let origin: Arc<dyn Origin> = Arc::new(HttpOrigin::new(&config.origin)?);
    Ok(CacheProxy::from_config(config, origin, store))
}

/// Bring the whole proxy up and serve until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let proxy = build_proxy(&config).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, proxy);
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
