/// Innings kernel — Invariant Checks
///
/// Every check returns `Err(InvariantViolation)` on the first failure.
/// Run by the engine after each committed event and by the runtime on
/// every snapshot restored from storage.

use crate::domain::{Innings, BALLS_PER_OVER, MAX_WICKETS};
use crate::error::EngineError;
use crate::undo::fold_log;
use crate::INNINGS_SCHEMA_VERSION;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run all checks, stopping at the first failure.
pub fn validate_invariants(innings: &Innings) -> Result<(), EngineError> {
    check_schema_version(innings)?;
    check_counter_bounds(innings)?;
    check_ball_records(innings)?;
    check_aggregates_match_log(innings)?;
    check_free_hit_source(innings)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Individual checks (private)
// ---------------------------------------------------------------------------

fn violation(msg: String) -> EngineError {
    EngineError::InvariantViolation(msg)
}

fn check_schema_version(innings: &Innings) -> Result<(), EngineError> {
    if innings.schema_version != INNINGS_SCHEMA_VERSION {
        return Err(EngineError::SchemaMismatch {
            expected: INNINGS_SCHEMA_VERSION,
            got: innings.schema_version,
        });
    }
    Ok(())
}

/// ballsInCurrentOver stays below six once a transition has committed,
/// and the ball position always sits one past it.
fn check_counter_bounds(innings: &Innings) -> Result<(), EngineError> {
    if innings.balls_in_current_over >= BALLS_PER_OVER {
        return Err(violation(format!(
            "ballsInCurrentOver={} left an over open past {} legal balls",
            innings.balls_in_current_over, BALLS_PER_OVER
        )));
    }
    if innings.wickets > MAX_WICKETS {
        return Err(violation(format!(
            "wickets={} exceeds {}",
            innings.wickets, MAX_WICKETS
        )));
    }
    if innings.current_ball != innings.balls_in_current_over + 1 {
        return Err(violation(format!(
            "currentBall={} does not follow ballsInCurrentOver={}",
            innings.current_ball, innings.balls_in_current_over
        )));
    }
    Ok(())
}

fn check_ball_records(innings: &Innings) -> Result<(), EngineError> {
    let mut prev_over = 0;
    for (i, ball) in innings.balls.iter().enumerate() {
        if ball.legal_ball != ball.extras.is_none() {
            return Err(violation(format!(
                "ball #{} legalBall={} disagrees with extras={:?}",
                i + 1,
                ball.legal_ball,
                ball.extras
            )));
        }
        if ball.over < prev_over || ball.over > innings.current_over {
            return Err(violation(format!(
                "ball #{} in over {} is out of order (current over {})",
                i + 1,
                ball.over,
                innings.current_over
            )));
        }
        if ball.ball == 0 || ball.ball > BALLS_PER_OVER {
            return Err(violation(format!(
                "ball #{} has position {} outside 1..={}",
                i + 1,
                ball.ball,
                BALLS_PER_OVER
            )));
        }
        prev_over = ball.over;
    }
    Ok(())
}

/// The log is the single source of truth: totals and the crease must equal
/// a fold of it from the openers.
fn check_aggregates_match_log(innings: &Innings) -> Result<(), EngineError> {
    let tally = fold_log(
        &innings.opening_striker,
        &innings.opening_non_striker,
        &innings.balls,
    );
    let pairs = [
        ("totalRuns", innings.total_runs, tally.total_runs),
        ("wickets", innings.wickets, tally.wickets),
        ("oversCompleted", innings.overs_completed, tally.overs_completed),
        (
            "ballsInCurrentOver",
            innings.balls_in_current_over,
            tally.balls_in_current_over,
        ),
    ];
    for (name, stored, folded) in pairs {
        if stored != folded {
            return Err(violation(format!(
                "{}={} but the ball log folds to {}",
                name, stored, folded
            )));
        }
    }
    if innings.on_strike != tally.on_strike || innings.off_strike != tally.off_strike {
        return Err(violation(format!(
            "crease ({:?}, {:?}) but the ball log folds to ({:?}, {:?})",
            innings.on_strike, innings.off_strike, tally.on_strike, tally.off_strike
        )));
    }
    Ok(())
}

/// A pending free hit can only come from the delivery just bowled.
fn check_free_hit_source(innings: &Innings) -> Result<(), EngineError> {
    if !innings.is_free_hit_pending {
        return Ok(());
    }
    match innings.last_ball() {
        Some(ball) if ball.is_no_ball() => Ok(()),
        _ => Err(violation(
            "free hit pending without a preceding no-ball".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures;
    use crate::transitions::{add_no_ball, add_runs, add_wide};

    #[test]
    fn fresh_innings_is_valid() {
        assert!(validate_invariants(&fixtures::innings()).is_ok());
    }

    #[test]
    fn tampered_total_is_detected() {
        let mut inn = add_runs(&fixtures::innings(), 4, "A").unwrap();
        inn.total_runs = 5;
        let err = validate_invariants(&inn).unwrap_err();
        assert!(err.to_string().contains("totalRuns=5"));
    }

    #[test]
    fn tampered_crease_is_detected() {
        let mut inn = add_runs(&fixtures::innings(), 1, "A").unwrap();
        std::mem::swap(&mut inn.on_strike, &mut inn.off_strike);
        assert!(matches!(
            validate_invariants(&inn),
            Err(EngineError::InvariantViolation(_))
        ));
    }

    #[test]
    fn orphan_free_hit_is_detected() {
        let mut inn = add_wide(&fixtures::innings(), "A").unwrap();
        inn.is_free_hit_pending = true;
        assert!(validate_invariants(&inn).is_err());
        let nb = add_no_ball(&fixtures::innings(), "A").unwrap();
        assert!(validate_invariants(&nb).is_ok());
    }

    #[test]
    fn schema_version_is_enforced() {
        let mut inn = fixtures::innings();
        inn.schema_version = 9;
        assert_eq!(
            validate_invariants(&inn),
            Err(EngineError::SchemaMismatch {
                expected: INNINGS_SCHEMA_VERSION,
                got: 9
            })
        );
    }
}
