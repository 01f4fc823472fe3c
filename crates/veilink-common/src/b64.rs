// ============================================
// File: crates/veilink-common/src/b64.rs
// ============================================
//! # Base64 Serde Helpers
//!
//! ## Creation Reason
//! Several Veilink types are fixed-size byte arrays that should read
//! as base64 strings in human-readable formats (JSON, logs) but stay
//! raw bytes in binary formats. This module centralizes that logic so
//! every newtype can use `#[serde(with = "veilink_common::b64")]`
//! instead of hand-rolling the same `Serialize`/`Deserialize` pair.
//!
//! ## Last Modified
//! v0.1.0 - Initial helpers

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Deserializer, Serializer};

/// Encodes bytes as a standard base64 string.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decodes a standard base64 string.
///
/// # Errors
/// Returns a decoding error if the input is not valid base64.
pub fn decode(s: &str) -> crate::Result<Vec<u8>> {
    Ok(BASE64.decode(s)?)
}

/// Serializes a fixed-size byte array.
///
/// Human-readable formats get a base64 string; binary formats get
/// the raw bytes.
pub fn serialize<S, const N: usize>(
    bytes: &[u8; N],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&BASE64.encode(bytes))
    } else {
        serializer.serialize_bytes(bytes)
    }
}

/// Deserializes a fixed-size byte array, rejecting wrong lengths.
pub fn deserialize<'de, D, const N: usize>(
    deserializer: D,
) -> std::result::Result<[u8; N], D::Error>
where
    D: Deserializer<'de>,
{
    let bytes = if deserializer.is_human_readable() {
        let s = String::deserialize(deserializer)?;
        BASE64.decode(&s).map_err(serde::de::Error::custom)?
    } else {
        <Vec<u8>>::deserialize(deserializer)?
    };
    let actual = bytes.len();
    <[u8; N]>::try_from(bytes)
        .map_err(|_| serde::de::Error::invalid_length(actual, &"fixed-size byte array"))
}

// ============================================
// Tests
// ============================================
