//! Static robots.txt responder.

use axum::{http::header, response::IntoResponse};

pub const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /search/";

/// Served directly, never cached or forwarded.
pub async fn robots_txt() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], ROBOTS_TXT)
}
