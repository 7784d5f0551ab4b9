/// Scenario tests — drive the public API the way a scoring screen does and
/// check the snapshot after each step.
///
/// The property tests at the bottom feed arbitrary event streams through
/// the engine; rejected events are skipped, accepted ones must keep the
/// snapshot consistent with its ball log.

use proptest::prelude::*;

use cricket_engine::invariants::validate_invariants;
use cricket_engine::stats::{batting_card, bowling_card, bowling_stats, fall_of_wickets};
use cricket_engine::state::create_innings;
use cricket_engine::transitions::{
    add_no_ball, add_runs, add_wicket, add_wide, apply_event, start_new_over,
};
use cricket_engine::undo::undo_last_ball;
use cricket_engine::{
    DeliveryEvent, EngineError, Innings, InningsEngine, InningsSetup, Wicket, WicketType,
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn setup() -> InningsSetup {
    InningsSetup {
        batting_team: "teamA".to_string(),
        bowling_team: "teamB".to_string(),
        batting_team_players: names(&["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"]),
        bowling_team_players: names(&["X", "Y", "Z"]),
        on_strike: "A".to_string(),
        off_strike: "B".to_string(),
        bowler: "X".to_string(),
        over_number: 1,
    }
}

fn fresh() -> Innings {
    create_innings(&setup()).unwrap()
}

// ── Worked scenarios ───────────────────────────────────────────────

#[test]
fn free_hit_run_out_scenario() {
    let inn = fresh();
    assert_eq!((inn.current_over, inn.current_ball), (1, 1));

    let inn = add_runs(&inn, 1, "A").unwrap();
    assert_eq!(inn.on_strike, "B");
    assert_eq!(inn.off_strike, "A");
    assert_eq!(inn.total_runs, 1);
    assert_eq!(inn.balls_in_current_over, 1);

    let inn = add_wide(&inn, "B").unwrap();
    assert_eq!(inn.total_runs, 2);
    assert_eq!(inn.balls_in_current_over, 1);

    let inn = add_no_ball(&inn, "B").unwrap();
    assert_eq!(inn.total_runs, 3);
    assert!(inn.is_free_hit_pending);

    let lbw = Wicket::new(WicketType::Lbw, "B");
    assert_eq!(
        add_wicket(&inn, &lbw, None),
        Err(EngineError::FreeHitDismissal { kind: WicketType::Lbw })
    );

    let run_out = Wicket::new(WicketType::RunOut, "B");
    let inn = add_wicket(&inn, &run_out, Some("C")).unwrap();
    assert_eq!(inn.wickets, 1);
    assert_eq!(inn.on_strike, "C");
    assert_eq!(inn.off_strike, "A");
    assert_eq!(inn.balls_in_current_over, 2);
    assert!(!inn.is_free_hit_pending);
    validate_invariants(&inn).unwrap();

    let fow = fall_of_wickets(&inn);
    assert_eq!(fow[0].how_out, "run out (sub)");
    assert_eq!(fow[0].score_at_fall, 3);
}

#[test]
fn maiden_over_scenario() {
    let mut inn = fresh();
    for _ in 0..6 {
        let striker = inn.on_strike.clone();
        inn = add_runs(&inn, 0, &striker).unwrap();
    }
    let s = bowling_stats(&inn, "X");
    assert_eq!(s.maidens, 1);
    assert_eq!(s.overs.notation(), 1.0);
    assert_eq!(s.economy, "0.00");
    assert_eq!((s.runs, s.wickets), (0, 0));
}

#[test]
fn over_boundary_waits_for_next_bowler() {
    let mut inn = fresh();
    for expected in 1..=5 {
        inn = add_runs(&inn, 0, "A").unwrap();
        assert_eq!(inn.balls_in_current_over, expected);
    }
    inn = add_runs(&inn, 0, "A").unwrap();
    assert_eq!(inn.balls_in_current_over, 0);
    assert_eq!(inn.overs_completed, 1);
    assert_eq!(inn.current_over, 1);
    assert!(inn.current_bowler.is_empty());
    assert_eq!((inn.on_strike.as_str(), inn.off_strike.as_str()), ("B", "A"));

    assert_eq!(add_wide(&inn, "B"), Err(EngineError::BowlerNotSelected));
    assert_eq!(
        undo_last_ball(&start_new_over(&inn, "Y").unwrap()),
        Err(EngineError::UndoOutsideOver {
            ball_over: 1,
            current_over: 2
        })
    );

    let inn = start_new_over(&inn, "Y").unwrap();
    let inn = add_runs(&inn, 4, "B").unwrap();
    let card = bowling_card(&inn);
    assert_eq!(card.len(), 2);
    assert_eq!(card[1].stats.bowler, "Y");
    assert_eq!(card[1].deliveries, "4");
}

#[test]
fn whole_batting_side_dismissed() {
    let mut engine = InningsEngine::new(&setup()).unwrap();
    let mut taken = 0;
    while taken < 10 {
        if engine.innings().current_bowler.is_empty() {
            let bowler = if engine.innings().overs_completed % 2 == 0 { "X" } else { "Y" };
            engine
                .apply(DeliveryEvent::StartOver {
                    bowler: bowler.to_string(),
                })
                .unwrap();
        }
        let striker = engine.innings().on_strike.clone();
        engine
            .apply(DeliveryEvent::Wicket {
                wicket: Wicket::new(WicketType::Bowled, &striker),
                next_player: None,
            })
            .unwrap();
        taken += 1;
    }

    let inn = engine.innings();
    assert_eq!(inn.wickets, 10);
    assert!(cricket_engine::completion::is_innings_complete(inn, 12));

    // K is the last man in and is left not out alongside the tenth dismissal.
    let not_out: Vec<_> = batting_card(inn)
        .into_iter()
        .filter(|row| row.at_crease)
        .map(|row| row.stats.player)
        .collect();
    assert!(not_out.contains(&"K".to_string()));

    // No eleventh dismissal.
    let striker = inn.on_strike.clone();
    if !inn.current_bowler.is_empty() {
        let err = engine
            .apply(DeliveryEvent::Wicket {
                wicket: Wicket::new(WicketType::Bowled, &striker),
                next_player: None,
            })
            .unwrap_err();
        assert_eq!(err, EngineError::AllOut { wickets: 10 });
    }
}

// ── Properties ─────────────────────────────────────────────────────

/// Raw choices; turned into a concrete event against the live snapshot.
#[derive(Debug, Clone)]
enum Step {
    Runs(u32),
    Wide,
    NoBall,
    Wicket(WicketType, bool),
    RunsWithWicket(u32),
    StartOver(usize),
    EndOver,
    Undo,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => prop::sample::select(vec![0u32, 1, 2, 3, 4, 6]).prop_map(Step::Runs),
        1 => Just(Step::Wide),
        1 => Just(Step::NoBall),
        1 => (prop::sample::select(WicketType::ALL.to_vec()), any::<bool>())
            .prop_map(|(k, striker)| Step::Wicket(k, striker)),
        1 => prop::sample::select(vec![0u32, 1, 2, 3]).prop_map(Step::RunsWithWicket),
        2 => (0usize..3).prop_map(Step::StartOver),
        1 => Just(Step::EndOver),
        1 => Just(Step::Undo),
    ]
}

fn to_event(inn: &Innings, step: &Step) -> DeliveryEvent {
    let striker = inn.on_strike.clone();
    match step {
        Step::Runs(r) => DeliveryEvent::Runs {
            runs: *r,
            batsman: striker,
        },
        Step::Wide => DeliveryEvent::Wide { batsman: striker },
        Step::NoBall => DeliveryEvent::NoBall { batsman: striker },
        Step::Wicket(kind, on_strike) => {
            let out = if *on_strike { striker } else { inn.off_strike.clone() };
            DeliveryEvent::Wicket {
                wicket: Wicket::new(*kind, &out).with_fielder("Z"),
                next_player: None,
            }
        }
        Step::RunsWithWicket(r) => DeliveryEvent::RunsWithWicket {
            runs: *r,
            wicket: Wicket::new(WicketType::RunOut, &inn.off_strike),
            next_player: None,
        },
        Step::StartOver(i) => DeliveryEvent::StartOver {
            bowler: ["X", "Y", "Z"][*i].to_string(),
        },
        Step::EndOver => DeliveryEvent::EndOver,
        Step::Undo => DeliveryEvent::Undo,
    }
}

fn is_delivery(event: &DeliveryEvent) -> bool {
    !matches!(
        event,
        DeliveryEvent::StartOver { .. } | DeliveryEvent::EndOver | DeliveryEvent::Undo
    )
}

proptest! {
    #[test]
    fn totals_always_match_the_log(steps in prop::collection::vec(step(), 0..120)) {
        let mut engine = InningsEngine::new(&setup()).unwrap();
        for s in &steps {
            let event = to_event(engine.innings(), s);
            let _ = engine.apply(event);

            let inn = engine.innings();
            let runs: u32 = inn.balls.iter().map(|b| b.runs).sum();
            let wickets = inn.balls.iter().filter(|b| b.wicket.is_some()).count() as u32;
            prop_assert_eq!(inn.total_runs, runs);
            prop_assert_eq!(inn.wickets, wickets);
            prop_assert!(validate_invariants(inn).is_ok());
        }
    }

    #[test]
    fn undo_reverses_any_accepted_delivery(steps in prop::collection::vec(step(), 1..80)) {
        let mut engine = InningsEngine::new(&setup()).unwrap();
        for s in &steps {
            let before = engine.innings().clone();
            let event = to_event(&before, s);
            if !is_delivery(&event) {
                let _ = engine.apply(event);
                continue;
            }
            let Ok(after) = apply_event(&before, &event) else { continue };
            if validate_invariants(&after).is_err() {
                continue;
            }

            let mut restored = undo_last_ball(&after).unwrap();
            if matches!(event, DeliveryEvent::NoBall { .. }) {
                prop_assert!(!restored.is_free_hit_pending);
                restored.is_free_hit_pending = before.is_free_hit_pending;
            }
            prop_assert_eq!(&restored, &before);

            engine.apply(event).unwrap();
        }
    }

    #[test]
    fn statistics_are_pure(steps in prop::collection::vec(step(), 0..60)) {
        let mut engine = InningsEngine::new(&setup()).unwrap();
        for s in &steps {
            let event = to_event(engine.innings(), s);
            let _ = engine.apply(event);
        }
        let inn = engine.innings();
        prop_assert_eq!(batting_card(inn), batting_card(inn));
        prop_assert_eq!(bowling_card(inn), bowling_card(inn));
        prop_assert_eq!(fall_of_wickets(inn), fall_of_wickets(inn));
    }
}
