/// Innings kernel — Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 hashing.
/// Produces byte-identical output across platforms.
///
/// Rules:
///   - kernel_version first, then the innings record
///   - innings fields in declaration order (serde derive)
///   - ball log in chronological order
///   - UTF-8 JSON, no whitespace, no float

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::Innings;
use crate::KERNEL_VERSION;

/// Canonical serialization of an innings to UTF-8 JSON bytes.
pub fn canonical_serialize(innings: &Innings) -> Vec<u8> {
    let mut root = Map::new();
    root.insert(
        "kernelVersion".to_string(),
        Value::Number(KERNEL_VERSION.into()),
    );
    root.insert(
        "innings".to_string(),
        serde_json::to_value(innings).expect("innings is a plain JSON tree"),
    );
    serde_json::to_vec(&Value::Object(root)).expect("canonical_serialize: JSON serialization failed")
}

/// SHA-256 of the canonical serialization. Lowercase hex.
pub fn canonical_hash(innings: &Innings) -> String {
    hex_digest(&canonical_serialize(innings))
}

/// Lowercase hex SHA-256 of arbitrary bytes.
pub fn hex_digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
