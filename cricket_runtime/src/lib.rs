#![forbid(unsafe_code)]

//! Cricket scoring runtime.
//!
//! Wraps the innings kernel with persistence, match records, replay
//! verification and session management.
//!
//! No scoring logic lives here. Every delivery, over change and undo is
//! delegated to the kernel; this crate only decides where the resulting
//! snapshots are kept.

pub mod error;
pub mod records;
pub mod snapshot;
pub mod store;
pub mod replay;
pub mod session;

pub use error::StoreError;
pub use records::{InningsState, MatchConfig, MatchRules, Team, TeamSide, Teams, Toss, TossChoice};
pub use session::{MatchSession, SharedSession};
pub use store::{FileStore, KeyValueStore, MemoryStore};
