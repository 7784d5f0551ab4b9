//! Kernel error taxonomy.
//!
//! Every rejection is surfaced synchronously and leaves the input snapshot
//! untouched. Re-applying the same input yields the same error.

use thiserror::Error;

use crate::domain::WicketType;

/// Errors produced by validators, transitions, undo and invariant checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid run value: {runs}. Must be 0, 1, 2, 3, 4, or 6.")]
    InvalidRun { runs: u32 },

    #[error("Invalid wicket type: {0:?}")]
    InvalidWicketType(String),

    #[error("Cannot take {kind} on a free hit. Only run out is allowed.")]
    FreeHitDismissal { kind: WicketType },

    #[error("Can only add balls to current over (current {expected}, got {got})")]
    OverMismatch { expected: u32, got: u32 },

    #[error("Current over is complete")]
    OverComplete,

    #[error("No bowler selected for the current over")]
    BowlerNotSelected,

    #[error("Bowler {bowler:?} is not a member of the bowling team")]
    InvalidBowler { bowler: String },

    #[error("All {wickets} wickets have fallen; no further dismissal is possible")]
    AllOut { wickets: u32 },

    #[error("No balls to undo")]
    NothingToUndo,

    #[error("Can only undo balls from current over (ball in over {ball_over}, current over {current_over})")]
    UndoOutsideOver { ball_over: u32, current_over: u32 },

    #[error("Cannot end over: only {balls} legal balls bowled")]
    OverNotComplete { balls: u32 },

    #[error("Schema version mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },

    #[error("Sequence violation: expected {expected}, got {got}")]
    SequenceViolation { expected: u64, got: u64 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid setup: {0}")]
    InvalidSetup(String),
}
