/// Innings kernel — Event Definitions
///
/// Events are pure data. They carry intent and payload only and contain
/// ZERO transition logic.
///
/// Schema version is locked at 1. Envelopes with any other version are
/// rejected by the engine.

use serde::{Deserialize, Serialize};

use crate::domain::Wicket;

/// Schema version for v1 envelopes.
pub const SCHEMA_VERSION: u32 = 1;

/// One scoring action, as entered by the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DeliveryEvent {
    Runs {
        runs: u32,
        batsman: String,
    },
    Wide {
        batsman: String,
    },
    NoBall {
        batsman: String,
    },
    Wicket {
        wicket: Wicket,
        #[serde(default)]
        next_player: Option<String>,
    },
    RunsWithWicket {
        runs: u32,
        wicket: Wicket,
        #[serde(default)]
        next_player: Option<String>,
    },
    StartOver {
        bowler: String,
    },
    EndOver,
    Undo,
}

impl DeliveryEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            DeliveryEvent::Runs { .. } => "runs",
            DeliveryEvent::Wide { .. } => "wide",
            DeliveryEvent::NoBall { .. } => "noBall",
            DeliveryEvent::Wicket { .. } => "wicket",
            DeliveryEvent::RunsWithWicket { .. } => "runsWithWicket",
            DeliveryEvent::StartOver { .. } => "startOver",
            DeliveryEvent::EndOver => "endOver",
            DeliveryEvent::Undo => "undo",
        }
    }
}

/// Sequenced event as stored in a replayable log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventEnvelope {
    pub sequence: u64,
    #[serde(default = "schema_v1")]
    pub schema_version: u32,
    pub event: DeliveryEvent,
}

fn schema_v1() -> u32 {
    SCHEMA_VERSION
}

impl EventEnvelope {
    pub fn new(sequence: u64, event: DeliveryEvent) -> Self {
        Self {
            sequence,
            schema_version: SCHEMA_VERSION,
            event,
        }
    }

    /// Number a plain event list 1, 2, 3, ...
    pub fn sequence_all(events: impl IntoIterator<Item = DeliveryEvent>) -> Vec<Self> {
        events
            .into_iter()
            .zip(1u64..)
            .map(|(event, seq)| Self::new(seq, event))
            .collect()
    }
}
