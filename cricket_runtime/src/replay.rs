//! Replay orchestrator — rebuild innings from event logs and detect drift.
//!
//! Delegates all scoring logic to the kernel.
//! No shortcuts, no cached state logic.

use cricket_engine::hashing::canonical_hash;
use cricket_engine::invariants::validate_invariants;
use cricket_engine::undo::fold_log;
use cricket_engine::{EngineError, EventEnvelope, Innings, InningsEngine, InningsSetup};

use crate::error::StoreError;

/// Rebuild an innings from its setup and full event log.
///
/// 1. Open a fresh innings from `setup`
/// 2. Pass each event sequentially to the kernel
/// 3. Return (final_innings, canonical_hash)
pub fn rebuild_innings(
    setup: &InningsSetup,
    events: &[EventEnvelope],
) -> Result<(Innings, String), EngineError> {
    let innings = InningsEngine::replay(setup, events)?.into_innings();
    let hash = canonical_hash(&innings);
    Ok((innings, hash))
}

/// Rebuild and return only the canonical hash.
pub fn rebuild_hash(setup: &InningsSetup, events: &[EventEnvelope]) -> Result<String, EngineError> {
    rebuild_innings(setup, events).map(|(_, hash)| hash)
}

/// Replay the same events twice and require identical hashes.
/// Returns the agreed hash.
pub fn verify_determinism(
    setup: &InningsSetup,
    events: &[EventEnvelope],
) -> Result<String, StoreError> {
    let first = rebuild_hash(setup, events)?;
    let second = rebuild_hash(setup, events)?;
    if first != second {
        return Err(StoreError::Drift { first, second });
    }
    Ok(first)
}

/// Check a restored snapshot against its own ball log: aggregates and the
/// crease must equal a fold of the log, along with every other kernel
/// invariant.
pub fn verify_snapshot_log(innings: &Innings) -> Result<(), EngineError> {
    validate_invariants(innings)
}

/// Difference between two innings (typically a stored snapshot and a
/// fresh replay).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftReport {
    pub total_runs_a: u32,
    pub total_runs_b: u32,
    pub total_runs_delta: i64,
    pub wickets_a: u32,
    pub wickets_b: u32,
    pub wickets_delta: i64,
    pub balls_logged_a: usize,
    pub balls_logged_b: usize,
    /// Index of the first ball record that differs, if any.
    pub first_divergent_ball: Option<usize>,
    /// True when the stored counters of either side disagree with its log.
    pub aggregate_mismatch: bool,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.total_runs_delta == 0
            && self.wickets_delta == 0
            && self.first_divergent_ball.is_none()
            && !self.aggregate_mismatch
    }
}

/// Structured comparison of two innings.
pub fn compare_innings(a: &Innings, b: &Innings) -> DriftReport {
    let first_divergent_ball = a
        .balls
        .iter()
        .zip(&b.balls)
        .position(|(x, y)| x != y)
        .or_else(|| (a.balls.len() != b.balls.len()).then(|| a.balls.len().min(b.balls.len())));

    DriftReport {
        total_runs_a: a.total_runs,
        total_runs_b: b.total_runs,
        total_runs_delta: i64::from(b.total_runs) - i64::from(a.total_runs),
        wickets_a: a.wickets,
        wickets_b: b.wickets,
        wickets_delta: i64::from(b.wickets) - i64::from(a.wickets),
        balls_logged_a: a.balls.len(),
        balls_logged_b: b.balls.len(),
        first_divergent_ball,
        aggregate_mismatch: !matches_log(a) || !matches_log(b),
    }
}

fn matches_log(innings: &Innings) -> bool {
    let tally = fold_log(
        &innings.opening_striker,
        &innings.opening_non_striker,
        &innings.balls,
    );
    tally.total_runs == innings.total_runs && tally.wickets == innings.wickets
}
