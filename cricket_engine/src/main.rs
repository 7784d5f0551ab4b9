/// Innings kernel — Replay Harness
///
/// Loads a scoring fixture, replays it through the engine twice (the
/// second run checks determinism) and prints the scorecard.
///
/// Usage: cricket_engine <fixture.json>
///
/// Fixture format:
///   { "setup": InningsSetup, "totalOvers": 12, "events": [DeliveryEvent, ...] }

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cricket_engine::completion::is_innings_complete;
use cricket_engine::hashing::canonical_hash;
use cricket_engine::stats::{
    batting_card, bowling_card, extras_summary, fall_of_wickets, score_display,
};
use cricket_engine::{DeliveryEvent, EventEnvelope, InningsEngine, InningsSetup};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    setup: InningsSetup,
    #[serde(default = "default_total_overs")]
    total_overs: u32,
    events: Vec<DeliveryEvent>,
}

fn default_total_overs() -> u32 {
    12
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: cricket_engine <fixture.json>");
        return ExitCode::from(2);
    };

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(fixture = %path, error = %err, "replay failed");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<(), Box<dyn Error>> {
    let fixture: Fixture = serde_json::from_str(&fs::read_to_string(path)?)?;
    info!(fixture = %path, events = fixture.events.len(), "loaded fixture");

    let envelopes = EventEnvelope::sequence_all(fixture.events);

    // Run 1
    let engine = InningsEngine::replay(&fixture.setup, &envelopes)?;
    let innings = engine.innings();
    let h1 = canonical_hash(innings);

    // Run 2 (determinism check)
    let h2 = canonical_hash(InningsEngine::replay(&fixture.setup, &envelopes)?.innings());
    if h1 != h2 {
        return Err(format!("determinism failure: {} != {}", h1, h2).into());
    }

    println!("{}", score_display(innings));
    if is_innings_complete(innings, fixture.total_overs) {
        println!("Innings complete");
    }

    println!("\nBatting");
    for row in batting_card(innings) {
        let s = &row.stats;
        println!(
            "  {:<16}{:>4} ({:>3})  4s {:>2}  6s {:>2}  SR {:>7}{}",
            s.player,
            s.runs,
            s.balls,
            s.fours,
            s.sixes,
            s.strike_rate,
            if row.at_crease { "  *" } else { "" }
        );
    }

    let extras = extras_summary(innings);
    println!(
        "  Extras {} (wd {}, nb {})",
        extras.total, extras.wide_runs, extras.no_ball_runs
    );

    println!("\nBowling");
    for row in bowling_card(innings) {
        let s = &row.stats;
        println!(
            "  {:<16}{:>5} {:>2} {:>4} {:>2}  econ {:>6}  [{}]",
            s.bowler, s.overs.to_string(), s.maidens, s.runs, s.wickets, s.economy, row.deliveries
        );
    }

    let fow = fall_of_wickets(innings);
    if !fow.is_empty() {
        println!("\nFall of wickets");
        for f in fow {
            println!("  {}-{} {} {}", f.wicket_number, f.score_at_fall, f.batsman, f.how_out);
        }
    }

    println!("\nhash {}", h1);
    Ok(())
}
