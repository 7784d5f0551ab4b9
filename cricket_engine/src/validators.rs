/// Innings kernel — Guard Predicates
///
/// Stateless checks run before any transition touches a snapshot.

use crate::domain::{Innings, WicketType, BALLS_PER_OVER};
use crate::error::EngineError;

/// Run values a batsman can be credited with off one delivery.
pub const VALID_RUNS: [u32; 6] = [0, 1, 2, 3, 4, 6];

/// True iff `runs` is one of 0, 1, 2, 3, 4, 6.
pub fn is_valid_run(runs: u32) -> bool {
    VALID_RUNS.contains(&runs)
}

/// `Err(InvalidRun)` unless `runs` is a creditable value.
pub fn check_run(runs: u32) -> Result<(), EngineError> {
    if is_valid_run(runs) {
        Ok(())
    } else {
        Err(EngineError::InvalidRun { runs })
    }
}

/// Parse a wicket type from its wire name.
pub fn parse_wicket_type(name: &str) -> Result<WicketType, EngineError> {
    name.parse()
}

/// On a free hit only a run-out may be taken.
pub fn can_take_wicket(is_free_hit: bool, kind: WicketType) -> bool {
    !is_free_hit || kind == WicketType::RunOut
}

/// A ball may only be added to the open, not yet complete, current over.
pub fn can_add_ball(innings: &Innings, over: u32, _ball: u32) -> Result<(), EngineError> {
    if over != innings.current_over {
        return Err(EngineError::OverMismatch {
            expected: innings.current_over,
            got: over,
        });
    }
    if innings.balls_in_current_over >= BALLS_PER_OVER {
        return Err(EngineError::OverComplete);
    }
    Ok(())
}

/// Undo is confined to deliveries of the still-open over.
pub fn can_undo(innings: &Innings) -> Result<(), EngineError> {
    let last = innings.last_ball().ok_or(EngineError::NothingToUndo)?;
    if last.over != innings.current_over {
        return Err(EngineError::UndoOutsideOver {
            ball_over: last.over,
            current_over: innings.current_over,
        });
    }
    Ok(())
}

/// A bowler must be named and, when the roster is known, belong to it.
pub fn validate_bowler(bowler: &str, bowling_team_players: &[String]) -> Result<(), EngineError> {
    if bowler.trim().is_empty() {
        return Err(EngineError::BowlerNotSelected);
    }
    if !bowling_team_players.is_empty() && !bowling_team_players.iter().any(|p| p == bowler) {
        return Err(EngineError::InvalidBowler {
            bowler: bowler.to_string(),
        });
    }
    Ok(())
}
