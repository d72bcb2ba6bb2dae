//! Stored value encoding for captured responses.
//!
//! ```text
//! CapturedResponse
//!     → {"headers": {...}, "data": "<text>" | [byte, ...]}   (compact JSON)
//!     → deflate
//!     → base64                                               (stored string)
//! ```
//!
//! Whether `data` is read back as bytes or text is decided by the caller
//! from the request URL, never by the stored value itself.

use std::io::{Read, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::http::response::{Body, CapturedResponse, Headers};

/// Fixed so identical responses always produce identical stored values.
const COMPRESSION_LEVEL: u32 = 6;

/// Failures turning a stored value back into a response (or, rarely, the reverse).
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("stored value is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("compression failed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected} body data, found {found}")]
    Shape {
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    headers: &'a Headers,
    data: DataRef<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum DataRef<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

#[derive(Deserialize)]
struct Envelope {
    headers: Headers,
    data: Value,
}

/// Encode a captured response into its stored string form.
pub fn serialize(response: &CapturedResponse) -> Result<String, CodecError> {
    let data = match &response.body {
        Body::Text(text) => DataRef::Text(text),
        Body::Binary(bytes) => DataRef::Bytes(bytes),
    };
    let json = serde_json::to_vec(&EnvelopeRef {
        headers: &response.headers,
        data,
    })?;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL));
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;

    Ok(STANDARD.encode(compressed))
}

/// Decode a stored string; `binary` must be the classification of the same URL
/// the value was stored under.
pub fn deserialize(value: &str, binary: bool) -> Result<CapturedResponse, CodecError> {
    let compressed = STANDARD.decode(value.trim())?;

    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;
    let Envelope { headers, data } = serde_json::from_slice(&json)?;

    let body = match (binary, data) {
        (true, data @ Value::Array(_)) => {
            Body::Binary(Bytes::from(serde_json::from_value::<Vec<u8>>(data)?))
        }
        (false, Value::String(text)) => Body::Text(text),
        (binary, other) => {
            return Err(CodecError::Shape {
                expected: if binary { "binary" } else { "text" },
                found: value_kind(&other),
            })
        }
    };

    Ok(CapturedResponse { headers, body })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
