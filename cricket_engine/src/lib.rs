#![forbid(unsafe_code)]

//! Ball-by-ball scoring kernel for a limited-overs innings.
//!
//! Every operation is a pure function from (snapshot, event) to a new
//! snapshot. The kernel performs no I/O; callers persist what it returns
//! and must funnel all events for one innings through a single owner.

/// Kernel v1. Behavioral changes bump this and the golden fixtures.
pub const KERNEL_VERSION: u32 = 1;

/// Version stamped into every innings record.
pub const INNINGS_SCHEMA_VERSION: u32 = 1;

pub mod error;
pub mod domain;
pub mod events;
pub mod state;
pub mod validators;
pub mod transitions;
pub mod undo;
pub mod invariants;
pub mod completion;
pub mod stats;
pub mod hashing;
pub mod engine;

pub use domain::{Ball, Extras, Innings, Wicket, WicketType};
pub use engine::InningsEngine;
pub use error::EngineError;
pub use events::{DeliveryEvent, EventEnvelope};
pub use state::InningsSetup;
