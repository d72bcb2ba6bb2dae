//! Binary content classification by URL suffix.

const BINARY_SUFFIXES: &[&str] = &[
    "png", "jpg", "jpeg", "tif", "tiff", "ttf", "woff", "woff2", "ico",
];

/// Whether the response for `resolved_url` must be handled as raw bytes.
///
/// Purely syntactic: one trailing `?` is ignored, then the URL must end in
/// a known image, font or icon suffix. The response content type is never
/// consulted, so the store and replay paths agree as long as they pass the
/// same URL.
pub fn is_binary(resolved_url: &str) -> bool {
    let url = resolved_url.strip_suffix('?').unwrap_or(resolved_url);
    BINARY_SUFFIXES.iter().any(|suffix| url.ends_with(suffix))
}
