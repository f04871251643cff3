// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identifier encoding for AAS Part 2 HTTP paths
//!
//! Identifiable IDs travel in URL paths as base64url without padding,
//! e.g. `GET /shells/{base64url(aasId)}`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use thiserror::Error;

/// Identifier decoding error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier is not valid base64url: {0}")]
    InvalidBase64(String),

    #[error("Decoded identifier is not valid UTF-8")]
    InvalidUtf8,
}

/// Encode an identifier for use in a URL path segment
///
/// ```rust
/// use mnestix_aas_search::domain::encode_id;
///
/// assert_eq!(encode_id("dummy aasId"), "ZHVtbXkgYWFzSWQ");
/// ```
pub fn encode_id(id: &str) -> String {
    URL_SAFE_NO_PAD.encode(id.as_bytes())
}

/// Decode a base64url path segment back into an identifier
///
/// Padded input is accepted as well, since some servers emit it.
pub fn decode_id(encoded: &str) -> Result<String, IdentifierError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.trim_end_matches('='))
        .map_err(|e| IdentifierError::InvalidBase64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|_| IdentifierError::InvalidUtf8)
}
