//! Inbound request parsing.
//!
//! # Responsibilities
//! - Parse the `Cookie` header(s) into a name → value jar, values percent-decoded
//! - Decode the query string into ordered key/value pairs
//! - Bundle what the cache pipeline needs into a `ProxyRequest`

use axum::http::{header, HeaderMap, Uri};

/// Cookies sent by the client, in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    /// Parse every `Cookie` header in `headers`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = Self::default();
        for value in headers.get_all(header::COOKIE) {
            if let Ok(value) = value.to_str() {
                jar.parse_into(value);
            }
        }
        jar
    }

    /// Parse a single `Cookie` header value.
    pub fn parse(value: &str) -> Self {
        let mut jar = Self::default();
        jar.parse_into(value);
        jar
    }

    fn parse_into(&mut self, value: &str) {
        for pair in value.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() || self.get(name).is_some() {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            self.cookies.push((name.to_string(), decode_value(value)));
        }
    }

    /// First value sent for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

/// Percent-decode a cookie value, keeping it raw when it does not decode to UTF-8.
fn decode_value(value: &str) -> String {
    if !value.contains('%') {
        return value.to_string();
    }
    match urlencoding::decode(value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value.to_string(),
    }
}

/// Decode a raw query string into pairs.
///
/// A key that repeats collapses into its first position with the values
/// joined by `,`.
pub fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let Some(query) = query else {
        return pairs;
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match pairs.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, joined)) => {
                joined.push(',');
                joined.push_str(&value);
            }
            None => pairs.push((key.into_owned(), value.into_owned())),
        }
    }
    pairs
}

/// The parts of an inbound request the cache pipeline looks at.
#[derive(Debug, Clone, Default)]
pub struct ProxyRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub cookies: CookieJar,
}

impl ProxyRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            path: uri.path().to_string(),
            query: query_pairs(uri.query()),
            cookies: CookieJar::from_headers(headers),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_cookies(mut self, cookie_header: &str) -> Self {
        self.cookies = CookieJar::parse(cookie_header);
        self
    }
}
