//! Caching reverse proxy for a content-management origin.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ proxy::CacheProxy ──▶ cache store (Redis)
//!                          │                  │  hit ▲   │ miss
//!                          │                  │      │   ▼
//!                    /robots.txt              │   origin::HttpOrigin ──▶ Origin
//!                                             ▼
//!     ◀────────────── allow-listed headers + text or binary body
//! ```

use std::path::PathBuf;

use clap::Parser;

use cache_proxy::config::load_config;
use cache_proxy::lifecycle::{startup, Shutdown};
use cache_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "cache-proxy")]
#[command(about = "Caching reverse proxy for a content-management origin", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults and environment variables apply without one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if cli.check {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    logging::init_logging(&config.observability);
    tracing::info!("cache-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        origin = %config.origin.base_url,
        cache_enabled = config.cache.enabled,
        cache_backend = ?config.cache.backend,
        ttl_secs = config.cache.ttl_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
