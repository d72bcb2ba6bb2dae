//! Captured origin responses and their conversion into client responses.
//!
//! # Responsibilities
//! - Model the cacheable unit: headers plus a text or binary body
//! - Provide case-insensitive header lookup as a single defined operation
//! - Turn a status plus captured response into an axum `Response`
//!
//! # Design Decisions
//! - Headers keep the name casing they arrived with
//! - Text bodies without a forwarded content type default to HTML

use std::collections::BTreeMap;

use axum::{
    body::Body as AxumBody,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Ordered header mapping, name as received → value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look a header up by exact name first, then ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.0.get(name) {
            return Some(value.as_str());
        }
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Response payload. Which variant is used is decided by the request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Binary(Bytes),
}

impl Body {
    pub fn is_binary(&self) -> bool {
        matches!(self, Body::Binary(_))
    }
}

/// The unit of cacheable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    pub headers: Headers,
    pub body: Body,
}

/// What the proxy hands back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    /// Already reduced to the forwarded allow-list.
    pub headers: Headers,
    pub body: Body,
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let default_type = match self.body {
            Body::Text(_) => "text/html; charset=utf-8",
            Body::Binary(_) => "application/octet-stream",
        };

        let mut response = match self.body {
            Body::Text(text) => Response::new(AxumBody::from(text)),
            Body::Binary(bytes) => Response::new(AxumBody::from(bytes)),
        };
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in self.headers.iter() {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => {
                    tracing::warn!(header = %name, "Dropping header that is not valid HTTP");
                }
            }
        }
        if !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(default_type));
        }

        response
    }
}
