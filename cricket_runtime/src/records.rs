//! Match records — the two documents a match persists.
//!
//!   - `MatchConfig`  (key `cricket_match_config`): rules, teams, toss
//!   - `InningsState` (key `cricket_match_state`):  innings list + active index
//!
//! Both are strict camelCase JSON trees. Unknown fields are rejected.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use cricket_engine::domain::BALLS_PER_OVER;
use cricket_engine::validators::validate_bowler;
use cricket_engine::{EngineError, Innings, InningsSetup};

use crate::error::StoreError;

// ── Configuration ──────────────────────────────────────────────────

pub const DEFAULT_TOTAL_OVERS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchRules {
    pub total_overs: u32,
    pub balls_per_over: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            total_overs: DEFAULT_TOTAL_OVERS,
            balls_per_over: BALLS_PER_OVER,
        }
    }
}

/// Which of the two configured teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamSide {
    TeamA,
    TeamB,
}

impl TeamSide {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamSide::TeamA => "teamA",
            TeamSide::TeamB => "teamB",
        }
    }

    pub fn other(self) -> Self {
        match self {
            TeamSide::TeamA => TeamSide::TeamB,
            TeamSide::TeamB => TeamSide::TeamA,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamSide {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teamA" => Ok(TeamSide::TeamA),
            "teamB" => Ok(TeamSide::TeamB),
            other => Err(StoreError::InvalidRecord(format!(
                "unknown team side {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Team {
    pub name: String,
    pub players: Vec<String>,
}

impl Team {
    pub fn new(name: &str, players: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            players: players.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Teams {
    pub team_a: Team,
    pub team_b: Team,
}

impl Default for Teams {
    fn default() -> Self {
        Self {
            team_a: Team::new("Red Storm", &[]),
            team_b: Team::new("Blue Thunder", &[]),
        }
    }
}

impl Teams {
    pub fn get(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::TeamA => &self.team_a,
            TeamSide::TeamB => &self.team_b,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TossChoice {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Toss {
    pub winner: Option<TeamSide>,
    pub choice: Option<TossChoice>,
}

impl Toss {
    /// Side that bats first once the toss is decided.
    pub fn batting_first(&self) -> Option<TeamSide> {
        match (self.winner?, self.choice?) {
            (winner, TossChoice::Bat) => Some(winner),
            (winner, TossChoice::Bowl) => Some(winner.other()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchConfig {
    pub match_id: String,
    pub rules: MatchRules,
    pub teams: Teams,
    pub toss: Toss,
}

impl Default for MatchConfig {
    /// Fresh configuration with a clock-derived id, `match_<millis>`.
    fn default() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self::new(&format!("match_{}", millis))
    }
}

impl MatchConfig {
    pub fn new(match_id: &str) -> Self {
        Self {
            match_id: match_id.to_string(),
            rules: MatchRules::default(),
            teams: Teams::default(),
            toss: Toss::default(),
        }
    }

    pub fn validate_setup(&self) -> Result<(), EngineError> {
        if self.rules.total_overs < 1 {
            return Err(EngineError::InvalidSetup(
                "Total overs must be at least 1".to_string(),
            ));
        }
        if self.rules.balls_per_over != BALLS_PER_OVER {
            return Err(EngineError::InvalidSetup(format!(
                "Overs have {} balls, got {}",
                BALLS_PER_OVER, self.rules.balls_per_over
            )));
        }
        if self.teams.team_a.players.is_empty() {
            return Err(EngineError::InvalidSetup(
                "Team A must have at least one player".to_string(),
            ));
        }
        if self.teams.team_b.players.is_empty() {
            return Err(EngineError::InvalidSetup(
                "Team B must have at least one player".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_toss(&self) -> Result<(), EngineError> {
        if self.toss.winner.is_none() {
            return Err(EngineError::InvalidSetup(
                "Toss winner must be selected".to_string(),
            ));
        }
        if self.toss.choice.is_none() {
            return Err(EngineError::InvalidSetup(
                "Toss choice must be selected".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_innings_start(&self) -> Result<(), EngineError> {
        self.validate_setup()?;
        self.validate_toss()
    }

    /// Setup for an innings with `batting` at the crease. The other side
    /// bowls; `bowler` must be one of theirs.
    pub fn innings_setup(
        &self,
        batting: TeamSide,
        on_strike: &str,
        off_strike: &str,
        bowler: &str,
    ) -> Result<InningsSetup, EngineError> {
        self.validate_innings_start()?;
        let bowling = batting.other();
        let bowling_players = &self.teams.get(bowling).players;
        validate_bowler(bowler, bowling_players)?;

        Ok(InningsSetup {
            batting_team: batting.as_str().to_string(),
            bowling_team: bowling.as_str().to_string(),
            batting_team_players: self.teams.get(batting).players.clone(),
            bowling_team_players: bowling_players.clone(),
            on_strike: on_strike.to_string(),
            off_strike: off_strike.to_string(),
            bowler: bowler.to_string(),
            over_number: 1,
        })
    }

    /// Display name for an innings' `battingTeam` value; unknown sides are
    /// shown as stored.
    pub fn team_name<'a>(&'a self, side: &'a str) -> &'a str {
        match side.parse::<TeamSide>() {
            Ok(side) => &self.teams.get(side).name,
            Err(_) => side,
        }
    }
}

// ── Innings list ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InningsState {
    pub innings: Vec<Innings>,
    /// Index into `innings`, `-1` when nothing is selected.
    pub current_innings_index: i32,
}

impl Default for InningsState {
    fn default() -> Self {
        Self {
            innings: Vec::new(),
            current_innings_index: -1,
        }
    }
}

impl InningsState {
    pub fn current_index(&self) -> Option<usize> {
        usize::try_from(self.current_innings_index)
            .ok()
            .filter(|i| *i < self.innings.len())
    }

    pub fn current(&self) -> Option<&Innings> {
        self.current_index().map(|i| &self.innings[i])
    }

    /// Append and select. Returns the new index.
    pub fn add_innings(&mut self, innings: Innings) -> usize {
        self.innings.push(innings);
        let index = self.innings.len() - 1;
        self.current_innings_index = index as i32;
        index
    }

    /// Remove the innings at `index`, keeping the selection on the same
    /// innings where possible. Deleting the selected innings selects its
    /// successor (or the new last one); an empty list selects nothing.
    pub fn delete_innings(&mut self, index: usize) -> Result<Innings, StoreError> {
        self.check_index(index)?;
        let removed = self.innings.remove(index);
        let current = self.current_innings_index;
        let index = index as i32;

        if index == current {
            self.current_innings_index = if self.innings.is_empty() {
                -1
            } else {
                index.min(self.innings.len() as i32 - 1)
            };
        } else if index < current {
            self.current_innings_index = current - 1;
        }
        Ok(removed)
    }

    pub fn set_current_innings(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.current_innings_index = index as i32;
        Ok(())
    }

    pub fn update_innings(&mut self, index: usize, innings: Innings) -> Result<(), StoreError> {
        self.check_index(index)?;
        self.innings[index] = innings;
        Ok(())
    }

    /// The selection must point inside the list or be `-1`.
    pub fn validate(&self) -> Result<(), StoreError> {
        let index = self.current_innings_index;
        if index == -1 || (index >= 0 && (index as usize) < self.innings.len()) {
            Ok(())
        } else {
            Err(StoreError::InvalidRecord(format!(
                "currentInningsIndex {} with {} innings",
                index,
                self.innings.len()
            )))
        }
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.innings.len() {
            Ok(())
        } else {
            Err(StoreError::InningsIndex {
                index,
                len: self.innings.len(),
            })
        }
    }
}
