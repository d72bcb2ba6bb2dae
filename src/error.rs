//! Request-level errors of the cache pipeline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cache::{CodecError, StoreError};

/// Failures that end a request with a server error.
///
/// Origin problems are not listed here: they are answered with the
/// fallback page instead.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The store reported an entry but returned no value for it.
    #[error("cache corruption: key {key} exists but holds no value")]
    CacheCorruption { key: String },

    /// A stored value could not be decoded.
    #[error("stored response is malformed: {0}")]
    Codec(#[from] CodecError),

    /// The store could not be queried.
    #[error("cache store error: {0}")]
    Store(#[from] StoreError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Short client-facing text; details stay in the logs.
    fn public_message(&self) -> &'static str {
        match self {
            ProxyError::CacheCorruption { .. } => "Cache corruption",
            ProxyError::Codec(_) => "Malformed cache entry",
            ProxyError::Store(_) => "Cache unavailable",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (self.status(), self.public_message()).into_response()
    }
}
