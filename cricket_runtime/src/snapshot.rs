//! Snapshot layer — self-verifying record envelopes.
//!
//! A snapshot wraps one persisted record as canonical JSON plus the SHA-256
//! of that JSON. No timestamps in snapshot content (determinism).
//!
//! - `seal`:              record → envelope
//! - `open`:              envelope → record, hash and schema checked
//! - `restore_innings`:   JSON → `Innings`, invariants checked
//! - `export_innings_to_file` / `import_innings_from_file`: file I/O

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cricket_engine::hashing::hex_digest;
use cricket_engine::invariants::validate_invariants;
use cricket_engine::Innings;

use crate::error::StoreError;

/// Envelope format version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Snapshot on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Snapshot {
    pub schema_version: u32,
    /// Store key the record was saved under.
    pub key: String,
    /// Canonical JSON of the record (UTF-8).
    pub canonical_json: String,
    /// SHA-256 of `canonical_json`, lowercase hex.
    pub hash: String,
    /// Kernel version at snapshot time.
    pub kernel_version: u32,
}

/// Lowercase hex SHA-256 of `json`.
pub fn snapshot_hash(json: &str) -> String {
    hex_digest(json.as_bytes())
}

/// Wrap `value` for storage under `key`.
pub fn seal(key: &str, value: &Value) -> Result<Snapshot, StoreError> {
    let canonical_json = serde_json::to_string(value)?;
    let hash = snapshot_hash(&canonical_json);
    Ok(Snapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        key: key.to_string(),
        canonical_json,
        hash,
        kernel_version: cricket_engine::KERNEL_VERSION,
    })
}

/// Returns true if the hash matches the canonical JSON content.
pub fn verify_snapshot_hash(snap: &Snapshot) -> bool {
    snapshot_hash(&snap.canonical_json) == snap.hash
}

/// Unwrap a snapshot, rejecting foreign schema versions and any content
/// that no longer matches its hash.
pub fn open(snap: &Snapshot) -> Result<Value, StoreError> {
    if snap.schema_version != SNAPSHOT_SCHEMA_VERSION {
        return Err(StoreError::SchemaMismatch {
            expected: SNAPSHOT_SCHEMA_VERSION,
            got: snap.schema_version,
        });
    }
    let actual = snapshot_hash(&snap.canonical_json);
    if actual != snap.hash {
        return Err(StoreError::CorruptSnapshot {
            key: snap.key.clone(),
            expected: snap.hash.clone(),
            actual,
        });
    }
    Ok(serde_json::from_str(&snap.canonical_json)?)
}

// ---------------------------------------------------------------------------
// Innings restore
// ---------------------------------------------------------------------------

/// Decode an innings and validate invariants immediately.
///
/// This is the safe entry point for loading an innings from untrusted
/// sources: strict decoding, then the kernel's full invariant suite.
pub fn restore_innings(json: &str) -> Result<Innings, StoreError> {
    let innings: Innings = serde_json::from_str(json)?;
    validate_invariants(&innings)?;
    Ok(innings)
}

/// Export an innings to a file as JSON. Creates parent directories.
pub fn export_innings_to_file(innings: &Innings, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string(innings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json.as_bytes())?;
    Ok(())
}

/// Import an innings from a JSON file, validating invariants.
pub fn import_innings_from_file(path: &Path) -> Result<Innings, StoreError> {
    let content = fs::read_to_string(path)?;
    restore_innings(&content)
}
