//! Runtime failures.
//!
//! Kernel rejections pass through unchanged as `StoreError::Engine`; every
//! other variant is about where records live, not about scoring.

use std::io;

use thiserror::Error;

use cricket_engine::EngineError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Snapshot {key:?} is corrupt: stored hash {expected}, content hashes to {actual}")]
    CorruptSnapshot {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Snapshot schema mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("No innings is selected")]
    NoActiveInnings,

    #[error("Innings index {index} out of range ({len} innings)")]
    InningsIndex { index: usize, len: usize },

    #[error("DETERMINISM FAILURE: replays hashed to {first} and {second}")]
    Drift { first: String, second: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
