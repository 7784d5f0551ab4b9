/// Innings kernel — Completion and Result
///
/// Pure predicates over finished or in-progress snapshots.

use serde::{Deserialize, Serialize};

use crate::domain::{Innings, MAX_WICKETS};

/// All out, or every allotted over bowled.
pub fn is_innings_complete(innings: &Innings, total_overs: u32) -> bool {
    innings.wickets >= MAX_WICKETS || innings.overs_completed >= total_overs
}

/// Runs the chasing side needs to win.
pub fn target(first: &Innings) -> u32 {
    first.total_runs + 1
}

/// Runs still required by the chasing side, never below zero.
pub fn runs_needed(first: &Innings, chasing: &Innings) -> u32 {
    target(first).saturating_sub(chasing.total_runs)
}

/// Outcome of a two-innings match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchResult {
    WonByRuns { winner: String, margin: u32 },
    WonByWickets { winner: String, margin: u32 },
    Tied,
}

impl MatchResult {
    /// Decide the match from the first and second innings totals.
    /// Team names are whatever the caller displays.
    pub fn decide(
        first: &Innings,
        second: &Innings,
        first_team_name: &str,
        second_team_name: &str,
    ) -> Self {
        if second.total_runs > first.total_runs {
            MatchResult::WonByWickets {
                winner: second_team_name.to_string(),
                margin: MAX_WICKETS.saturating_sub(second.wickets),
            }
        } else if first.total_runs > second.total_runs {
            MatchResult::WonByRuns {
                winner: first_team_name.to_string(),
                margin: first.total_runs - second.total_runs,
            }
        } else {
            MatchResult::Tied
        }
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            MatchResult::WonByRuns { winner, .. } | MatchResult::WonByWickets { winner, .. } => {
                Some(winner.as_str())
            }
            MatchResult::Tied => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            MatchResult::WonByRuns { winner, margin } => {
                format!("{} won by {} run{}", winner, margin, plural(*margin))
            }
            MatchResult::WonByWickets { winner, margin } => {
                format!("{} won by {} wicket{}", winner, margin, plural(*margin))
            }
            MatchResult::Tied => "Match Tied".to_string(),
        }
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
