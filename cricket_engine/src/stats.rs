/// Innings kernel — Statistics
///
/// Read-only folds over the ball log, recomputed on every call and never
/// cached in the snapshot.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Ball, Innings, Wicket, WicketType, BALLS_PER_OVER};

// ---------------------------------------------------------------------------
// Overs
// ---------------------------------------------------------------------------

/// A count of legal balls, displayed in cricket notation: `4.5` is four
/// overs and five balls, not a decimal fraction.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Overs(u32);

impl Overs {
    pub fn from_legal_balls(legal_balls: u32) -> Self {
        Overs(legal_balls)
    }

    pub fn legal_balls(self) -> u32 {
        self.0
    }

    pub fn completed(self) -> u32 {
        self.0 / BALLS_PER_OVER
    }

    pub fn remainder(self) -> u32 {
        self.0 % BALLS_PER_OVER
    }

    /// The notation read as a number, `completed + remainder / 10`.
    /// Only meaningful for display and the economy divisor.
    pub fn notation(self) -> f64 {
        f64::from(self.completed()) + f64::from(self.remainder()) / 10.0
    }
}

impl fmt::Display for Overs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.completed(), self.remainder())
    }
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStats {
    pub player: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: String,
}

/// Runs, boundaries and strike rate over the legal, non-wicket deliveries
/// `player` faced.
pub fn batting_stats(innings: &Innings, player: &str) -> BattingStats {
    let faced = innings
        .balls
        .iter()
        .filter(|b| b.batsman == player && b.legal_ball && b.wicket.is_none());

    let (mut runs, mut balls, mut fours, mut sixes) = (0, 0, 0, 0);
    for ball in faced {
        runs += ball.runs;
        balls += 1;
        match ball.runs {
            4 => fours += 1,
            6 => sixes += 1,
            _ => {}
        }
    }

    BattingStats {
        player: player.to_string(),
        runs,
        balls,
        fours,
        sixes,
        strike_rate: two_places(runs, f64::from(balls), 100.0),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingCardEntry {
    #[serde(flatten)]
    pub stats: BattingStats,
    pub at_crease: bool,
}

/// One row per batting-roster player, in roster order.
pub fn batting_card(innings: &Innings) -> Vec<BattingCardEntry> {
    innings
        .batting_team_players
        .iter()
        .map(|p| BattingCardEntry {
            stats: batting_stats(innings, p),
            at_crease: innings.is_at_crease(p),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Bowling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingStats {
    pub bowler: String,
    pub overs: Overs,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: String,
}

/// Figures for `bowler`. Runs conceded include extras and every wicket
/// taken off their delivery counts, run outs included; a maiden is an over
/// of six legal balls with nothing conceded.
pub fn bowling_stats(innings: &Innings, bowler: &str) -> BowlingStats {
    let mut runs = 0;
    let mut wickets = 0;
    let mut legal_balls = 0;
    // over number -> (legal balls, runs conceded)
    let mut per_over: BTreeMap<u32, (u32, u32)> = BTreeMap::new();

    for ball in innings.balls.iter().filter(|b| b.bowler == bowler) {
        runs += ball.runs;
        if ball.wicket.is_some() {
            wickets += 1;
        }
        let over = per_over.entry(ball.over).or_insert((0, 0));
        over.1 += ball.runs;
        if ball.legal_ball {
            legal_balls += 1;
            over.0 += 1;
        }
    }

    let maidens = per_over
        .values()
        .filter(|(legal, conceded)| *legal == BALLS_PER_OVER && *conceded == 0)
        .count() as u32;
    let overs = Overs::from_legal_balls(legal_balls);

    BowlingStats {
        bowler: bowler.to_string(),
        overs,
        maidens,
        runs,
        wickets,
        economy: two_places(runs, overs.notation(), 1.0),
    }
}

/// Deliveries of `bowler` grouped by over: `"1, 4, W | WD, 0"`.
/// `"-"` when the bowler has not bowled.
pub fn bowler_ball_details(innings: &Innings, bowler: &str) -> String {
    let mut overs: BTreeMap<u32, Vec<&Ball>> = BTreeMap::new();
    for ball in innings.balls.iter().filter(|b| b.bowler == bowler) {
        overs.entry(ball.over).or_default().push(ball);
    }
    if overs.is_empty() {
        return "-".to_string();
    }

    overs
        .into_values()
        .map(|mut balls| {
            // stable: illegal deliveries keep log order within a position
            balls.sort_by_key(|b| b.ball);
            balls
                .iter()
                .map(|b| delivery_symbol(b))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn delivery_symbol(ball: &Ball) -> String {
    if ball.wicket.is_some() {
        "W".to_string()
    } else if ball.is_wide() {
        "WD".to_string()
    } else if ball.is_no_ball() {
        "NB".to_string()
    } else {
        ball.runs.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingCardEntry {
    #[serde(flatten)]
    pub stats: BowlingStats,
    pub deliveries: String,
}

/// One row per bowler, in order of their first delivery.
pub fn bowling_card(innings: &Innings) -> Vec<BowlingCardEntry> {
    let mut bowlers: Vec<&str> = Vec::new();
    for ball in &innings.balls {
        if !bowlers.contains(&ball.bowler.as_str()) {
            bowlers.push(&ball.bowler);
        }
    }
    bowlers
        .into_iter()
        .map(|b| BowlingCardEntry {
            stats: bowling_stats(innings, b),
            deliveries: bowler_ball_details(innings, b),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fall of wickets, extras, score line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallOfWicket {
    pub wicket_number: u32,
    pub score_at_fall: u32,
    pub batsman: String,
    pub how_out: String,
}

/// Every dismissal with the running score when it fell, most recent first.
pub fn fall_of_wickets(innings: &Innings) -> Vec<FallOfWicket> {
    let mut score = 0;
    let mut fallen = Vec::new();
    for ball in &innings.balls {
        score += ball.runs;
        if let Some(w) = &ball.wicket {
            fallen.push(FallOfWicket {
                wicket_number: fallen.len() as u32 + 1,
                score_at_fall: score,
                batsman: w.batsman.clone(),
                how_out: format_dismissal(w),
            });
        }
    }
    fallen.reverse();
    fallen
}

/// Scorecard notation for a dismissal, e.g. `c Smith b Jones`.
pub fn format_dismissal(wicket: &Wicket) -> String {
    let bowler = wicket.bowler.as_deref().unwrap_or("");
    let fielder = wicket.fielder.as_deref().unwrap_or("sub");
    match wicket.kind {
        WicketType::Bowled => format!("b {}", bowler),
        WicketType::Caught => format!("c {} b {}", fielder, bowler),
        WicketType::RunOut => format!("run out ({})", fielder),
        WicketType::Lbw => format!("lbw b {}", bowler),
        WicketType::Stumped => format!("st {} b {}", fielder, bowler),
        WicketType::HitWicket => format!("hit wicket b {}", bowler),
        WicketType::RetiredHurt => "retired hurt".to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasSummary {
    pub wides: u32,
    pub wide_runs: u32,
    pub no_balls: u32,
    pub no_ball_runs: u32,
    pub total: u32,
}

pub fn extras_summary(innings: &Innings) -> ExtrasSummary {
    let mut s = ExtrasSummary::default();
    for ball in &innings.balls {
        if ball.is_wide() {
            s.wides += 1;
            s.wide_runs += ball.runs;
        } else if ball.is_no_ball() {
            s.no_balls += 1;
            s.no_ball_runs += ball.runs;
        }
    }
    s.total = s.wide_runs + s.no_ball_runs;
    s
}

/// `"72/4 in 9.3 overs"`.
pub fn score_display(innings: &Innings) -> String {
    format!(
        "{}/{} in {}.{} overs",
        innings.total_runs, innings.wickets, innings.overs_completed, innings.balls_in_current_over
    )
}

/// `numerator / divisor * scale` to two places, halves rounded away from
/// zero; `"0.00"` for a zero divisor.
fn two_places(numerator: u32, divisor: f64, scale: f64) -> String {
    if divisor > 0.0 {
        let value = f64::from(numerator) / divisor * scale;
        format!("{:.2}", (value * 100.0).round() / 100.0)
    } else {
        "0.00".to_string()
    }
}
