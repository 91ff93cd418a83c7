//! Base64 and data URI helpers

use base64::{engine::general_purpose::STANDARD, Engine};
use crate::error::{AppError, Result};

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode base64 text, accepting either bare base64 or a full data URI
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let data = match parse_data_uri(encoded) {
        Some((_, payload)) => payload,
        None => encoded,
    };

    STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::InvalidRequest(format!("Invalid base64 data: {}", e)))
}

/// Build a `data:` URI from a media type and base64 payload
pub fn data_uri(media_type: &str, b64: &str) -> String {
    format!("data:{};base64,{}", media_type, b64)
}

/// Split a base64 `data:` URI into (media type, payload)
pub fn parse_data_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let media_type = header.strip_suffix(";base64")?;
    Some((media_type, payload))
}

/// Get the media type of a data URI
pub fn media_type_of(uri: &str) -> Option<&str> {
    parse_data_uri(uri).map(|(media_type, _)| media_type)
}
