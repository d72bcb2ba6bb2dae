//! Origin (content backend) access.
//!
//! # Responsibilities
//! - Perform the single GET the cache pipeline needs per miss
//! - Pick a byte or text reading of the body from the binary classification
//! - Report failures as a tagged result, never a raw transport error
//! - Provide the fixed fallback response used when the origin fails

pub mod client;

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

use crate::http::response::{Body, CapturedResponse, Headers};

pub use client::HttpOrigin;

/// Body served when the origin cannot produce a page.
pub const FALLBACK_BODY: &str = "<html><body>The page you are looking for can not found. Please click <a href=\"/\">here</a> to return home.</body></html>";

/// A successful origin answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginReply {
    pub status: StatusCode,
    pub response: CapturedResponse,
}

impl OriginReply {
    /// The fixed 404 reply substituted for any origin failure.
    pub fn fallback() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            response: CapturedResponse {
                headers: Headers::new(),
                body: Body::Text(FALLBACK_BODY.to_string()),
            },
        }
    }
}

/// Why an origin fetch produced no usable reply.
#[derive(Debug, Error)]
pub enum OriginFailure {
    #[error("origin request failed: {0}")]
    Transport(String),

    #[error("origin answered with status {0}")]
    Status(StatusCode),
}

impl OriginFailure {
    /// Every failure is presented to the client as the same fallback page.
    pub fn into_fallback(self) -> OriginReply {
        OriginReply::fallback()
    }
}

/// Something that can fetch a resolved URL from the origin.
#[async_trait]
pub trait Origin: Send + Sync {
    /// GET `url`, sending `cookie` as the `cookie` header when present.
    ///
    /// With `binary` set the body is returned as raw bytes, otherwise as text.
    async fn fetch(
        &self,
        url: &str,
        cookie: Option<&str>,
        binary: bool,
    ) -> Result<OriginReply, OriginFailure>;
}
