/// Innings kernel — Core Domain Types
///
/// Pure data. No transition logic.
/// Every record is a plain serde tree (camelCase JSON) so a snapshot
/// round-trips exactly through any text serializer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Legal deliveries per over.
pub const BALLS_PER_OVER: u32 = 6;

/// Dismissals that end an innings.
pub const MAX_WICKETS: u32 = 10;

// ── Delivery records ───────────────────────────────────────────────

/// How a batsman was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WicketType {
    Bowled,
    Caught,
    RunOut,
    Lbw,
    Stumped,
    HitWicket,
    RetiredHurt,
}

impl WicketType {
    pub const ALL: [WicketType; 7] = [
        WicketType::Bowled,
        WicketType::Caught,
        WicketType::RunOut,
        WicketType::Lbw,
        WicketType::Stumped,
        WicketType::HitWicket,
        WicketType::RetiredHurt,
    ];

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            WicketType::Bowled => "bowled",
            WicketType::Caught => "caught",
            WicketType::RunOut => "runOut",
            WicketType::Lbw => "lbw",
            WicketType::Stumped => "stumped",
            WicketType::HitWicket => "hitWicket",
            WicketType::RetiredHurt => "retiredHurt",
        }
    }
}

impl fmt::Display for WicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WicketType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WicketType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EngineError::InvalidWicketType(s.to_string()))
    }
}

/// Extra type for an illegal delivery. Legal deliveries carry `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Extras {
    Wide,
    NoBall,
}

/// A dismissal. `bowler` is absent for run-outs unless supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Wicket {
    #[serde(rename = "type")]
    pub kind: WicketType,
    pub batsman: String,
    pub bowler: Option<String>,
    pub fielder: Option<String>,
}

impl Wicket {
    /// A dismissal with no bowler or fielder attached.
    pub fn new(kind: WicketType, batsman: &str) -> Self {
        Self {
            kind,
            batsman: batsman.to_string(),
            bowler: None,
            fielder: None,
        }
    }

    pub fn with_fielder(mut self, fielder: &str) -> Self {
        self.fielder = Some(fielder.to_string());
        self
    }

    pub fn with_bowler(mut self, bowler: &str) -> Self {
        self.bowler = Some(bowler.to_string());
        self
    }
}

/// One delivery. Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Ball {
    pub over: u32,
    /// 1-based position among legal deliveries of the over.
    pub ball: u32,
    pub runs: u32,
    pub extras: Option<Extras>,
    pub wicket: Option<Wicket>,
    pub batsman: String,
    pub bowler: String,
    pub is_free_hit: bool,
    pub legal_ball: bool,
    /// Batsman who replaced the dismissed one, when a replacement was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_batsman: Option<String>,
}

impl Ball {
    pub fn is_wide(&self) -> bool {
        self.extras == Some(Extras::Wide)
    }

    pub fn is_no_ball(&self) -> bool {
        self.extras == Some(Extras::NoBall)
    }
}

// ── Innings snapshot ───────────────────────────────────────────────

/// Complete innings snapshot. Every transition returns a new value of
/// this type; the ball log is the single source of truth for aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Innings {
    pub schema_version: u32,
    pub batting_team: String,
    pub bowling_team: String,
    pub batting_team_players: Vec<String>,
    pub bowling_team_players: Vec<String>,
    pub opening_striker: String,
    pub opening_non_striker: String,
    pub balls: Vec<Ball>,
    pub current_over: u32,
    pub current_ball: u32,
    /// Empty means a bowler must be selected before the next delivery.
    pub current_bowler: String,
    pub on_strike: String,
    pub off_strike: String,
    pub total_runs: u32,
    pub wickets: u32,
    pub overs_completed: u32,
    pub balls_in_current_over: u32,
    pub is_free_hit_pending: bool,
}

impl Innings {
    pub fn bowler_selected(&self) -> bool {
        !self.current_bowler.is_empty()
    }

    /// Batsmen dismissed so far, in order of dismissal.
    pub fn dismissed_batsmen(&self) -> Vec<&str> {
        self.balls
            .iter()
            .filter_map(|b| b.wicket.as_ref().map(|w| w.batsman.as_str()))
            .collect()
    }

    pub fn is_at_crease(&self, player: &str) -> bool {
        self.on_strike == player || self.off_strike == player
    }

    pub fn last_ball(&self) -> Option<&Ball> {
        self.balls.last()
    }
}
