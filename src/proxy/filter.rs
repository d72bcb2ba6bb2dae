//! Cookie and header allow-lists.
//!
//! Only allow-listed cookies reach the origin (and the cache key), and only
//! allow-listed origin headers reach the client.

use crate::config::ForwardingConfig;
use crate::http::request::CookieJar;
use crate::http::response::Headers;

/// Process-wide allow-lists, fixed at startup.
#[derive(Debug, Clone)]
pub struct ForwardingRules {
    cookies: Vec<String>,
    headers: Vec<String>,
}

impl ForwardingRules {
    pub fn new(cookies: Vec<String>, headers: Vec<String>) -> Self {
        Self { cookies, headers }
    }

    pub fn from_config(config: &ForwardingConfig) -> Self {
        Self::new(config.cookies.clone(), config.headers.clone())
    }

    /// `name=value` for every allow-listed cookie present with a value, in allow-list order.
    pub fn extract_cookies(&self, jar: &CookieJar) -> Vec<String> {
        self.cookies
            .iter()
            .filter_map(|name| {
                jar.get(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| format!("{}={}", name, value))
            })
            .collect()
    }

    /// The forwarded cookie string: extracted cookies joined by `"; "`.
    pub fn cookie_string(&self, jar: &CookieJar) -> String {
        self.extract_cookies(jar).join("; ")
    }

    /// Allow-listed headers from `captured`, keyed by their allow-list spelling.
    pub fn select_response_headers(&self, captured: &Headers) -> Headers {
        self.headers
            .iter()
            .filter_map(|name| {
                captured
                    .get(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (name.clone(), value.to_string()))
            })
            .collect()
    }
}

impl Default for ForwardingRules {
    fn default() -> Self {
        Self::from_config(&ForwardingConfig::default())
    }
}
