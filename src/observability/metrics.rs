//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_cache_hits_total` (counter): requests answered from the store
//! - `proxy_cache_misses_total` (counter): requests forwarded to the origin
//! - `proxy_origin_failures_total` (counter): origin fetches replaced by the fallback page
//! - `proxy_cache_store_errors_total` (counter): failed or skipped cache writes
//! - `proxy_responses_total` (counter): responses by status
//! - `proxy_request_duration_seconds` (histogram): latency by outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_cache_hit() {
    counter!("proxy_cache_hits_total").increment(1);
}

pub fn record_cache_miss() {
    counter!("proxy_cache_misses_total").increment(1);
}

pub fn record_origin_failure() {
    counter!("proxy_origin_failures_total").increment(1);
}

pub fn record_store_error() {
    counter!("proxy_cache_store_errors_total").increment(1);
}

/// Count a finished request and its latency.
pub fn record_response(status: u16, outcome: &'static str, start: Instant) {
    counter!("proxy_responses_total", "status" => status.to_string()).increment(1);
    histogram!("proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
