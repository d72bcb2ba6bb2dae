//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the caching proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin the proxy forwards to.
    pub origin: OriginConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Cookie and header allow-lists.
    pub forwarding: ForwardingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Origin (content backend) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total time allowed for one origin request in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/exist/apps/prodomo".to_string(),
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Which key-value store backs the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Memory,
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false every request goes to the origin and nothing is stored.
    pub enabled: bool,

    /// Store implementation.
    pub backend: StoreBackend,

    /// Redis connection URL (used when `backend = "redis"`).
    pub redis_url: String,

    /// Entry time-to-live in seconds.
    pub ttl_secs: u64,
}

/// Four weeks.
pub const DEFAULT_TTL_SECS: u64 = 60 * 60 * 24 * 7 * 4;

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: StoreBackend::Redis,
            redis_url: "redis://localhost:6379".to_string(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

/// Allow-lists of cookies and headers that cross the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Request cookies forwarded to the origin and mixed into the cache key, in order.
    pub cookies: Vec<String>,

    /// Origin response headers passed back to the client.
    pub headers: Vec<String>,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            cookies: ["ASPECTSORTING", "SORTING", "PERSONSORTING", "LANG"]
                .into_iter()
                .map(String::from)
                .collect(),
            headers: ["Content-Type", "Accept-Language"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment() {
        let config = ProxyConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.cache.ttl_secs, 2_419_200);
        assert_eq!(config.cache.backend, StoreBackend::Redis);
        assert_eq!(
            config.forwarding.cookies,
            vec!["ASPECTSORTING", "SORTING", "PERSONSORTING", "LANG"]
        );
        assert_eq!(config.forwarding.headers, vec!["Content-Type", "Accept-Language"]);
    }

    #[test]
    fn test_partial_toml() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [cache]
            backend = "memory"
            ttl_secs = 60

            [forwarding]
            cookies = ["LANG"]
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.backend, StoreBackend::Memory);
        assert_eq!(config.cache.ttl_secs, 60);
        assert!(config.cache.enabled);
        assert_eq!(config.forwarding.cookies, vec!["LANG"]);
        // Untouched sections keep their defaults.
        assert_eq!(config.forwarding.headers.len(), 2);
        assert_eq!(config.origin.request_timeout_secs, 30);
    }
}
