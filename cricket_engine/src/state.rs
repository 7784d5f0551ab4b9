/// Innings kernel — State Construction
///
/// Builds the opening snapshot of an innings and the immutable ball
/// records appended by transitions.

use serde::{Deserialize, Serialize};

use crate::domain::{Ball, Extras, Innings, Wicket};
use crate::error::EngineError;
use crate::INNINGS_SCHEMA_VERSION;

/// Everything needed to open an innings: rosters, two openers and the
/// opening bowler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InningsSetup {
    pub batting_team: String,
    pub bowling_team: String,
    pub batting_team_players: Vec<String>,
    pub bowling_team_players: Vec<String>,
    pub on_strike: String,
    pub off_strike: String,
    pub bowler: String,
    #[serde(default = "first_over")]
    pub over_number: u32,
}

fn first_over() -> u32 {
    1
}

/// Create the opening snapshot: over `over_number` (normally 1), ball 1,
/// empty log, zeroed counters.
pub fn create_innings(setup: &InningsSetup) -> Result<Innings, EngineError> {
    if setup.on_strike.is_empty() || setup.off_strike.is_empty() {
        return Err(EngineError::InvalidSetup(
            "both opening batsmen must be named".to_string(),
        ));
    }
    if setup.on_strike == setup.off_strike {
        return Err(EngineError::InvalidSetup(format!(
            "opening batsmen must differ, got {:?} twice",
            setup.on_strike
        )));
    }
    if setup.over_number == 0 {
        return Err(EngineError::InvalidSetup(
            "over numbers are 1-based".to_string(),
        ));
    }

    Ok(Innings {
        schema_version: INNINGS_SCHEMA_VERSION,
        batting_team: setup.batting_team.clone(),
        bowling_team: setup.bowling_team.clone(),
        batting_team_players: setup.batting_team_players.clone(),
        bowling_team_players: setup.bowling_team_players.clone(),
        opening_striker: setup.on_strike.clone(),
        opening_non_striker: setup.off_strike.clone(),
        balls: Vec::new(),
        current_over: setup.over_number,
        current_ball: 1,
        current_bowler: setup.bowler.clone(),
        on_strike: setup.on_strike.clone(),
        off_strike: setup.off_strike.clone(),
        total_runs: 0,
        wickets: 0,
        overs_completed: 0,
        balls_in_current_over: 0,
        is_free_hit_pending: false,
    })
}

/// Build the record for a delivery bowled at the snapshot's current
/// position. Legality follows from `extras`.
pub fn create_ball(
    innings: &Innings,
    runs: u32,
    extras: Option<Extras>,
    wicket: Option<Wicket>,
    batsman: &str,
) -> Ball {
    Ball {
        over: innings.current_over,
        ball: innings.current_ball,
        runs,
        extras,
        wicket,
        batsman: batsman.to_string(),
        bowler: innings.current_bowler.clone(),
        is_free_hit: innings.is_free_hit_pending,
        legal_ball: extras.is_none(),
        incoming_batsman: None,
    }
}
