/// Innings kernel — Delivery Transitions
///
/// ALL snapshot-mutation logic for deliveries and over boundaries lives here.
/// Every operation validates first, then works on a clone; the input
/// snapshot is never modified and nothing is committed on error.

use crate::domain::{Extras, Innings, Wicket, WicketType, BALLS_PER_OVER, MAX_WICKETS};
use crate::error::EngineError;
use crate::events::DeliveryEvent;
use crate::state::create_ball;
use crate::undo::undo_last_ball;
use crate::validators::{can_add_ball, can_take_wicket, check_run, validate_bowler};

// ---------------------------------------------------------------------------
// Public dispatcher
// ---------------------------------------------------------------------------

/// Apply one event to `innings` and return the new snapshot.
pub fn apply_event(innings: &Innings, event: &DeliveryEvent) -> Result<Innings, EngineError> {
    match event {
        DeliveryEvent::Runs { runs, batsman } => add_runs(innings, *runs, batsman),
        DeliveryEvent::Wide { batsman } => add_wide(innings, batsman),
        DeliveryEvent::NoBall { batsman } => add_no_ball(innings, batsman),
        DeliveryEvent::Wicket { wicket, next_player } => {
            add_wicket(innings, wicket, next_player.as_deref())
        }
        DeliveryEvent::RunsWithWicket {
            runs,
            wicket,
            next_player,
        } => add_runs_with_wicket(innings, *runs, wicket, next_player.as_deref()),
        DeliveryEvent::StartOver { bowler } => start_new_over(innings, bowler),
        DeliveryEvent::EndOver => end_over(innings),
        DeliveryEvent::Undo => undo_last_ball(innings),
    }
}

// ---------------------------------------------------------------------------
// Deliveries
// ---------------------------------------------------------------------------

/// Legal delivery off which `runs` were scored.
pub fn add_runs(innings: &Innings, runs: u32, batsman: &str) -> Result<Innings, EngineError> {
    check_run(runs)?;
    check_open_over(innings)?;

    let mut next = innings.clone();
    next.balls.push(create_ball(innings, runs, None, None, batsman));
    next.total_runs += runs;
    next.is_free_hit_pending = false;

    rotate_strike_after_runs(&mut next, runs);
    advance_legal_ball(&mut next);
    Ok(next)
}

/// Wide: one run, no legal ball, clears a pending free hit.
pub fn add_wide(innings: &Innings, batsman: &str) -> Result<Innings, EngineError> {
    check_open_over(innings)?;

    let mut next = innings.clone();
    next.balls.push(create_ball(innings, 1, Some(Extras::Wide), None, batsman));
    next.total_runs += 1;
    next.is_free_hit_pending = false;
    Ok(next)
}

/// No-ball: one run, no legal ball, the next legal delivery is a free hit.
pub fn add_no_ball(innings: &Innings, batsman: &str) -> Result<Innings, EngineError> {
    check_open_over(innings)?;

    let mut next = innings.clone();
    next.balls.push(create_ball(innings, 1, Some(Extras::NoBall), None, batsman));
    next.total_runs += 1;
    next.is_free_hit_pending = true;
    Ok(next)
}

/// Legal delivery on which `wicket.batsman` is dismissed without scoring.
///
/// The dismissed batsman is replaced by `next_player` if given, otherwise
/// by [`next_batsman`]. When nobody is left the crease is left as-is.
pub fn add_wicket(
    innings: &Innings,
    wicket: &Wicket,
    next_player: Option<&str>,
) -> Result<Innings, EngineError> {
    check_open_over(innings)?;
    check_wickets_remaining(innings)?;
    check_free_hit(innings, wicket.kind)?;

    let record = wicket_record(innings, wicket);
    let mut next = innings.clone();
    next.balls
        .push(create_ball(innings, 0, None, Some(record), &wicket.batsman));
    next.wickets += 1;
    next.is_free_hit_pending = false;

    replace_dismissed(&mut next, &wicket.batsman, next_player);
    advance_legal_ball(&mut next);
    Ok(next)
}

/// Legal delivery on which runs were completed and a batsman dismissed
/// (typically a run-out). Runs and strike rotation apply before the
/// replacement comes in.
pub fn add_runs_with_wicket(
    innings: &Innings,
    runs: u32,
    wicket: &Wicket,
    next_player: Option<&str>,
) -> Result<Innings, EngineError> {
    check_run(runs)?;
    check_open_over(innings)?;
    check_wickets_remaining(innings)?;
    check_free_hit(innings, wicket.kind)?;

    let record = wicket_record(innings, wicket);
    let mut next = innings.clone();
    next.balls
        .push(create_ball(innings, runs, None, Some(record), &wicket.batsman));
    next.total_runs += runs;
    next.wickets += 1;
    next.is_free_hit_pending = false;

    rotate_strike_after_runs(&mut next, runs);
    replace_dismissed(&mut next, &wicket.batsman, next_player);
    advance_legal_ball(&mut next);
    Ok(next)
}

// ---------------------------------------------------------------------------
// Over lifecycle
// ---------------------------------------------------------------------------

/// Hand the next over to `bowler`.
///
/// In the normal post-completion state (ball 1, nothing bowled) this only
/// assigns the bowler and moves to the next over number; strike was already
/// swapped when the previous over closed. Otherwise the current over must
/// hold six legal balls, and the boundary is crossed here.
pub fn start_new_over(innings: &Innings, bowler: &str) -> Result<Innings, EngineError> {
    validate_bowler(bowler, &innings.bowling_team_players)?;

    let mut next = innings.clone();
    if innings.balls_in_current_over == 0 && innings.current_ball == 1 {
        next.current_bowler = bowler.to_string();
        next.current_over += 1;
        return Ok(next);
    }

    if innings.balls_in_current_over != BALLS_PER_OVER {
        return Err(EngineError::OverNotComplete {
            balls: innings.balls_in_current_over,
        });
    }

    next.current_bowler = bowler.to_string();
    next.current_over += 1;
    next.current_ball = 1;
    next.balls_in_current_over = 0;
    swap_strike(&mut next);
    Ok(next)
}

/// Close an over that holds six legal balls outside the automatic trigger.
pub fn end_over(innings: &Innings) -> Result<Innings, EngineError> {
    if innings.balls_in_current_over < BALLS_PER_OVER {
        return Err(EngineError::OverNotComplete {
            balls: innings.balls_in_current_over,
        });
    }
    let mut next = innings.clone();
    complete_over(&mut next);
    Ok(next)
}

/// Over-boundary bookkeeping. `current_over` is left alone: the snapshot
/// now reads "over closed, bowler not yet chosen" until `start_new_over`.
pub(crate) fn complete_over(innings: &mut Innings) {
    innings.overs_completed += 1;
    innings.balls_in_current_over = 0;
    innings.current_ball = 1;
    innings.current_bowler.clear();
    swap_strike(innings);
}

// ---------------------------------------------------------------------------
// Batsman selection
// ---------------------------------------------------------------------------

/// First roster player who is neither dismissed nor at the crease.
/// `None` means nobody is left to bat.
pub fn next_batsman(roster: &[String], dismissed: &[&str], at_crease: [&str; 2]) -> Option<String> {
    roster
        .iter()
        .find(|p| !dismissed.contains(&p.as_str()) && !at_crease.contains(&p.as_str()))
        .cloned()
}

// ---------------------------------------------------------------------------
// Helpers (private)
// ---------------------------------------------------------------------------

fn check_open_over(innings: &Innings) -> Result<(), EngineError> {
    can_add_ball(innings, innings.current_over, innings.current_ball)?;
    if !innings.bowler_selected() {
        return Err(EngineError::BowlerNotSelected);
    }
    Ok(())
}

fn check_wickets_remaining(innings: &Innings) -> Result<(), EngineError> {
    if innings.wickets >= MAX_WICKETS {
        return Err(EngineError::AllOut {
            wickets: innings.wickets,
        });
    }
    Ok(())
}

fn check_free_hit(innings: &Innings, kind: WicketType) -> Result<(), EngineError> {
    if can_take_wicket(innings.is_free_hit_pending, kind) {
        Ok(())
    } else {
        Err(EngineError::FreeHitDismissal { kind })
    }
}

/// The wicket's bowler defaults to whoever is bowling the delivery.
fn wicket_record(innings: &Innings, wicket: &Wicket) -> Wicket {
    let bowler = match &wicket.bowler {
        Some(b) if !b.is_empty() => b.clone(),
        _ => innings.current_bowler.clone(),
    };
    Wicket {
        kind: wicket.kind,
        batsman: wicket.batsman.clone(),
        bowler: Some(bowler),
        fielder: wicket.fielder.clone().filter(|f| !f.is_empty()),
    }
}

pub(crate) fn swap_strike(innings: &mut Innings) {
    std::mem::swap(&mut innings.on_strike, &mut innings.off_strike);
}

pub(crate) fn rotate_strike_after_runs(innings: &mut Innings, runs: u32) {
    if runs % 2 == 1 {
        swap_strike(innings);
    }
}

/// Count a legal ball; closing the over on the sixth.
fn advance_legal_ball(innings: &mut Innings) {
    innings.balls_in_current_over += 1;
    if innings.balls_in_current_over == BALLS_PER_OVER {
        complete_over(innings);
    } else {
        innings.current_ball += 1;
    }
}

/// Swap the dismissed batsman for the incoming one and record who came in
/// on the delivery just appended.
fn replace_dismissed(innings: &mut Innings, dismissed: &str, next_player: Option<&str>) {
    let incoming = match next_player.filter(|p| !p.is_empty()) {
        Some(p) => Some(p.to_string()),
        None => {
            let out = innings.dismissed_batsmen();
            next_batsman(
                &innings.batting_team_players,
                &out,
                [innings.on_strike.as_str(), innings.off_strike.as_str()],
            )
        }
    };
    let Some(incoming) = incoming else {
        return;
    };

    if innings.on_strike == dismissed {
        innings.on_strike = incoming.clone();
    } else if innings.off_strike == dismissed {
        innings.off_strike = incoming.clone();
    } else {
        return;
    }
    if let Some(ball) = innings.balls.last_mut() {
        ball.incoming_batsman = Some(incoming);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures;

    fn run_out(batsman: &str) -> Wicket {
        Wicket::new(WicketType::RunOut, batsman)
    }

    #[test]
    fn odd_runs_rotate_strike() {
        let inn = fixtures::innings();
        for r in [1, 3] {
            let next = add_runs(&inn, r, "A").unwrap();
            assert_eq!((next.on_strike.as_str(), next.off_strike.as_str()), ("B", "A"));
        }
        for r in [0, 2, 4, 6] {
            let next = add_runs(&inn, r, "A").unwrap();
            assert_eq!((next.on_strike.as_str(), next.off_strike.as_str()), ("A", "B"));
        }
    }

    #[test]
    fn invalid_run_leaves_input_untouched() {
        let inn = fixtures::innings();
        assert_eq!(add_runs(&inn, 5, "A"), Err(EngineError::InvalidRun { runs: 5 }));
        assert_eq!(inn, fixtures::innings());
    }

    #[test]
    fn wide_and_no_ball_do_not_advance_the_over() {
        let inn = add_runs(&fixtures::innings(), 2, "A").unwrap();
        let wide = add_wide(&inn, "A").unwrap();
        assert_eq!(wide.total_runs, 3);
        assert_eq!(wide.balls_in_current_over, 1);
        assert_eq!(wide.current_ball, 2);
        assert!(!wide.balls[1].legal_ball);

        let nb = add_no_ball(&wide, "A").unwrap();
        assert_eq!(nb.total_runs, 4);
        assert_eq!(nb.balls_in_current_over, 1);
        assert_eq!(nb.balls[2].ball, 2);
        assert!(nb.is_free_hit_pending);
        assert_eq!(nb.on_strike, "A");
    }

    #[test]
    fn free_hit_rejects_everything_but_run_out() {
        let inn = add_no_ball(&fixtures::innings(), "A").unwrap();
        for kind in WicketType::ALL {
            let w = Wicket::new(kind, "A");
            let res = add_wicket(&inn, &w, None);
            if kind == WicketType::RunOut {
                assert!(res.is_ok());
            } else {
                assert_eq!(res, Err(EngineError::FreeHitDismissal { kind }));
            }
        }
        let res = add_runs_with_wicket(&inn, 1, &Wicket::new(WicketType::Caught, "A"), None);
        assert!(matches!(res, Err(EngineError::FreeHitDismissal { .. })));
    }

    #[test]
    fn consecutive_no_balls_keep_free_hit() {
        let inn = add_no_ball(&fixtures::innings(), "A").unwrap();
        let inn = add_no_ball(&inn, "A").unwrap();
        assert!(inn.is_free_hit_pending);
        assert!(inn.balls[1].is_free_hit);
        let inn = add_runs(&inn, 0, "A").unwrap();
        assert!(!inn.is_free_hit_pending);
        assert!(inn.balls[2].is_free_hit);
    }

    #[test]
    fn wide_consumes_free_hit() {
        let inn = add_no_ball(&fixtures::innings(), "A").unwrap();
        let inn = add_wide(&inn, "A").unwrap();
        assert!(!inn.is_free_hit_pending);
    }

    #[test]
    fn wicket_auto_selects_next_batsman() {
        let inn = fixtures::innings();
        let next = add_wicket(&inn, &Wicket::new(WicketType::Bowled, "A"), None).unwrap();
        assert_eq!(next.wickets, 1);
        assert_eq!(next.on_strike, "C");
        assert_eq!(next.off_strike, "B");
        let ball = next.last_ball().unwrap();
        assert_eq!(ball.incoming_batsman.as_deref(), Some("C"));
        let w = ball.wicket.as_ref().unwrap();
        assert_eq!(w.bowler.as_deref(), Some("X"));
    }

    #[test]
    fn run_out_records_the_bowler_of_the_delivery() {
        let next = add_wicket(&fixtures::innings(), &run_out("B"), Some("D")).unwrap();
        assert_eq!(next.off_strike, "D");
        let w = next.last_ball().unwrap().wicket.as_ref().unwrap();
        assert_eq!(w.bowler.as_deref(), Some("X"));
    }

    #[test]
    fn no_dismissal_after_ten_wickets() {
        let mut inn = fixtures::innings();
        for _ in 0..MAX_WICKETS {
            if inn.current_bowler.is_empty() {
                inn = start_new_over(&inn, "Y").unwrap();
            }
            let striker = inn.on_strike.clone();
            inn = add_wicket(&inn, &Wicket::new(WicketType::Bowled, &striker), None).unwrap();
        }
        assert_eq!(inn.wickets, 10);

        let striker = inn.on_strike.clone();
        let bowled = Wicket::new(WicketType::Bowled, &striker);
        assert_eq!(
            add_wicket(&inn, &bowled, None),
            Err(EngineError::AllOut { wickets: 10 })
        );
        assert_eq!(
            add_runs_with_wicket(&inn, 1, &run_out(&striker), None),
            Err(EngineError::AllOut { wickets: 10 })
        );
        // Scoring strokes are still accepted; only dismissals are capped.
        assert!(add_runs(&inn, 1, &striker).is_ok());
    }

    #[test]
    fn runs_with_wicket_rotates_before_replacing() {
        // A takes a single, B ends up on strike, then A is run out at the other end.
        let inn = fixtures::innings();
        let next = add_runs_with_wicket(&inn, 1, &run_out("A"), Some("C")).unwrap();
        assert_eq!(next.total_runs, 1);
        assert_eq!(next.wickets, 1);
        assert_eq!(next.on_strike, "B");
        assert_eq!(next.off_strike, "C");
        assert_eq!(next.balls_in_current_over, 1);
    }

    #[test]
    fn no_replacement_when_roster_exhausted() {
        let mut inn = fixtures::innings();
        inn.batting_team_players = vec!["A".to_string(), "B".to_string()];
        let next = add_wicket(&inn, &Wicket::new(WicketType::Lbw, "A"), None).unwrap();
        assert_eq!(next.on_strike, "A");
        assert_eq!(next.last_ball().unwrap().incoming_batsman, None);
    }

    #[test]
    fn six_legal_balls_close_the_over() {
        let mut inn = fixtures::innings();
        for _ in 0..5 {
            inn = add_runs(&inn, 0, "A").unwrap();
        }
        assert_eq!(inn.balls_in_current_over, 5);
        assert_eq!(inn.current_ball, 6);
        inn = add_runs(&inn, 0, "A").unwrap();
        assert_eq!(inn.balls_in_current_over, 0);
        assert_eq!(inn.overs_completed, 1);
        assert_eq!(inn.current_ball, 1);
        assert_eq!(inn.current_over, 1);
        assert_eq!(inn.current_bowler, "");
        assert_eq!(inn.on_strike, "B");
        assert_eq!(inn.off_strike, "A");

        assert_eq!(add_runs(&inn, 1, "B"), Err(EngineError::BowlerNotSelected));

        let inn = start_new_over(&inn, "Y").unwrap();
        assert_eq!(inn.current_over, 2);
        assert_eq!(inn.current_bowler, "Y");
        assert_eq!(inn.on_strike, "B");
    }

    #[test]
    fn start_new_over_mid_over_is_rejected() {
        let inn = add_runs(&fixtures::innings(), 0, "A").unwrap();
        assert_eq!(
            start_new_over(&inn, "Y"),
            Err(EngineError::OverNotComplete { balls: 1 })
        );
    }

    #[test]
    fn start_new_over_defensive_path() {
        let mut inn = add_runs(&fixtures::innings(), 0, "A").unwrap();
        inn.balls_in_current_over = 6;
        let next = start_new_over(&inn, "Y").unwrap();
        assert_eq!(next.current_over, 2);
        assert_eq!(next.current_ball, 1);
        assert_eq!(next.balls_in_current_over, 0);
        assert_eq!(next.on_strike, "B");
    }

    #[test]
    fn start_new_over_rejects_unknown_bowler() {
        let inn = fixtures::innings();
        assert!(matches!(
            start_new_over(&inn, "Nobody"),
            Err(EngineError::InvalidBowler { .. })
        ));
    }

    #[test]
    fn end_over_requires_six_balls() {
        let inn = add_runs(&fixtures::innings(), 0, "A").unwrap();
        assert_eq!(end_over(&inn), Err(EngineError::OverNotComplete { balls: 1 }));

        let mut full = inn.clone();
        full.balls_in_current_over = 6;
        let closed = end_over(&full).unwrap();
        assert_eq!(closed.overs_completed, 1);
        assert_eq!(closed.balls_in_current_over, 0);
        assert!(closed.current_bowler.is_empty());
    }

    #[test]
    fn next_batsman_skips_dismissed_and_crease() {
        let roster: Vec<String> = ["A", "B", "C", "D"].iter().map(|s| s.to_string()).collect();
        assert_eq!(next_batsman(&roster, &["C"], ["A", "B"]), Some("D".to_string()));
        assert_eq!(next_batsman(&roster, &["C", "D"], ["A", "B"]), None);
    }

    #[test]
    fn dispatcher_routes_events() {
        let inn = fixtures::innings();
        let ev = DeliveryEvent::Runs {
            runs: 4,
            batsman: "A".to_string(),
        };
        let next = apply_event(&inn, &ev).unwrap();
        assert_eq!(next.total_runs, 4);
        let back = apply_event(&next, &DeliveryEvent::Undo).unwrap();
        assert_eq!(back, inn);
    }
}
