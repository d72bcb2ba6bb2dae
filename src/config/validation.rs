//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, socket addresses and value ranges
//! - Reject allow-list entries that can never match
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::{ProxyConfig, StoreBackend};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field}: '{value}' is not a usable name")]
    InvalidName { field: &'static str, value: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    match Url::parse(&config.origin.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            field: "origin.base_url",
            value: config.origin.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field: "origin.base_url",
            value: config.origin.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.origin.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "origin.request_timeout_secs" });
    }
    if config.origin.connect_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "origin.connect_timeout_secs" });
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::Zero { field: "cache.ttl_secs" });
    }
    if config.cache.enabled && config.cache.backend == StoreBackend::Redis {
        if let Err(e) = Url::parse(&config.cache.redis_url) {
            errors.push(ValidationError::InvalidUrl {
                field: "cache.redis_url",
                value: config.cache.redis_url.clone(),
                reason: e.to_string(),
            });
        }
    }

    for cookie in &config.forwarding.cookies {
        let unusable = cookie.is_empty()
            || cookie
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '=' | ';' | ','));
        if unusable {
            errors.push(ValidationError::InvalidName {
                field: "forwarding.cookies",
                value: cookie.clone(),
            });
        }
    }
    for header in &config.forwarding.headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidName {
                field: "forwarding.headers",
                value: header.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
