//! Cache key derivation.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Separator between the resolved URL and the forwarded cookie string.
const KEY_SEPARATOR: &str = "--";

/// Opaque, storage-safe identifier of a (resolved URL, forwarded cookies) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Base64 of `resolved_url + "--" + cookie_string`.
    ///
    /// Requests that resolve to the same URL and forward the same cookies
    /// share a key on purpose.
    pub fn derive(resolved_url: &str, cookie_string: &str) -> Self {
        let raw = format!("{}{}{}", resolved_url, KEY_SEPARATOR, cookie_string);
        Self(STANDARD.encode(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
