//! reqwest-based origin client.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use bytes::Bytes;
use reqwest::header::COOKIE;

use crate::config::OriginConfig;
use crate::http::response::{Body, CapturedResponse, Headers};
use crate::origin::{Origin, OriginFailure, OriginReply};

/// Origin client over a shared connection pool.
#[derive(Clone)]
pub struct HttpOrigin {
    client: reqwest::Client,
}

impl HttpOrigin {
    /// Build a client with the configured timeouts.
    pub fn new(config: &OriginConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl From<reqwest::Error> for OriginFailure {
    fn from(err: reqwest::Error) -> Self {
        OriginFailure::Transport(err.to_string())
    }
}

/// Copy response headers, folding repeated names into one comma-separated value.
fn capture_headers(headers: &HeaderMap) -> Headers {
    let mut captured = Headers::new();
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !values.is_empty() {
            captured.insert(name.as_str(), values.join(", "));
        }
    }
    captured
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn fetch(
        &self,
        url: &str,
        cookie: Option<&str>,
        binary: bool,
    ) -> Result<OriginReply, OriginFailure> {
        let mut request = self.client.get(url);
        if let Some(cookie) = cookie.filter(|c| !c.is_empty()) {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OriginFailure::Status(status));
        }

        let headers = capture_headers(response.headers());
        let body = if binary {
            let bytes: Bytes = response.bytes().await?;
            Body::Binary(bytes)
        } else {
            Body::Text(response.text().await?)
        };

        Ok(OriginReply {
            status,
            response: CapturedResponse { headers, body },
        })
    }
}
