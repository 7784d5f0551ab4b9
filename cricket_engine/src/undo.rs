/// Innings kernel — Undo by Replay
///
/// Undo never reverses an operation. It drops the last delivery and
/// recomputes every derived counter by folding the remaining log from an
/// empty innings, so aggregates stay a pure function of the log.

use crate::domain::{Ball, Innings, BALLS_PER_OVER};
use crate::error::EngineError;
use crate::validators::can_undo;

/// Everything a ball log determines on its own, starting from the openers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTally {
    pub total_runs: u32,
    pub wickets: u32,
    pub overs_completed: u32,
    pub balls_in_current_over: u32,
    pub on_strike: String,
    pub off_strike: String,
}

/// Fold `balls` in chronological order.
///
/// Strike follows the same rules as the transitions: odd runs off a legal
/// ball swap ends, a recorded incoming batsman takes the dismissed
/// batsman's place, and the sixth legal ball of an over swaps ends.
pub fn fold_log(opening_striker: &str, opening_non_striker: &str, balls: &[Ball]) -> LogTally {
    let mut tally = LogTally {
        total_runs: 0,
        wickets: 0,
        overs_completed: 0,
        balls_in_current_over: 0,
        on_strike: opening_striker.to_string(),
        off_strike: opening_non_striker.to_string(),
    };

    for ball in balls {
        tally.total_runs += ball.runs;
        if ball.legal_ball && ball.runs % 2 == 1 {
            std::mem::swap(&mut tally.on_strike, &mut tally.off_strike);
        }

        if let Some(wicket) = &ball.wicket {
            tally.wickets += 1;
            if let Some(incoming) = &ball.incoming_batsman {
                if tally.on_strike == wicket.batsman {
                    tally.on_strike = incoming.clone();
                } else if tally.off_strike == wicket.batsman {
                    tally.off_strike = incoming.clone();
                }
            }
        }

        if ball.legal_ball {
            tally.balls_in_current_over += 1;
            if tally.balls_in_current_over == BALLS_PER_OVER {
                tally.overs_completed += 1;
                tally.balls_in_current_over = 0;
                std::mem::swap(&mut tally.on_strike, &mut tally.off_strike);
            }
        }
    }

    tally
}

/// Remove the last delivery of the open over and rebuild the snapshot
/// from the remaining log.
///
/// Position, bowler and free-hit state come back as they were just before
/// the removed delivery. Exception: removing a no-ball always clears the
/// free hit, even if one was already pending before it.
///
/// The position is taken from the removed delivery, not as the last
/// remaining entry's over and ball + 1, which is wrong after a wide or
/// across an over boundary.
pub fn undo_last_ball(innings: &Innings) -> Result<Innings, EngineError> {
    can_undo(innings)?;

    let mut next = innings.clone();
    let removed = next.balls.pop().ok_or(EngineError::NothingToUndo)?;
    let tally = fold_log(&next.opening_striker, &next.opening_non_striker, &next.balls);

    next.total_runs = tally.total_runs;
    next.wickets = tally.wickets;
    next.overs_completed = tally.overs_completed;
    next.balls_in_current_over = tally.balls_in_current_over;
    next.current_over = removed.over;
    next.current_ball = tally.balls_in_current_over + 1;
    next.current_bowler = removed.bowler.clone();
    next.on_strike = tally.on_strike;
    next.off_strike = tally.off_strike;
    next.is_free_hit_pending = if removed.is_no_ball() {
        false
    } else {
        removed.is_free_hit
    };

    Ok(next)
}
