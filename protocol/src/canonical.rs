//! Canonical serialization and content addressing.
//!
//! Every revision is hashed over its canonical JSON form: the record is
//! first converted to a `serde_json::Value`, whose object maps are
//! `BTreeMap`-backed and therefore serialize with sorted keys. The hash
//! is the lowercase-hex SHA-256 of that string. Stable under field
//! reordering in source code, so hashes recorded in the ledger remain
//! comparable across releases.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Serialize `value` as canonical (sorted-key) JSON.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let normalized = serde_json::to_value(value)?;
    serde_json::to_string(&normalized)
}

/// Lowercase-hex SHA-256 of the canonical serialization of `value`.
pub fn content_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(value)?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(format!("{digest:x}"))
}

/// Lowercase-hex SHA-256 of raw bytes (used for mesh payloads).
pub fn bytes_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}
