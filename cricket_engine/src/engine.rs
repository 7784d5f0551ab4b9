/// Innings kernel — Engine
///
/// Stateful owner of one innings. Delegates every change to the pure
/// transition layer and checks invariants before committing.
///
/// Strict sequence enforcement: one event at a time, no gaps.

use tracing::{debug, warn};

use crate::domain::Innings;
use crate::error::EngineError;
use crate::events::{DeliveryEvent, EventEnvelope, SCHEMA_VERSION};
use crate::invariants::validate_invariants;
use crate::state::{create_innings, InningsSetup};
use crate::transitions::apply_event as transition_apply;

/// Single writer for an innings snapshot.
#[derive(Debug, Clone)]
pub struct InningsEngine {
    innings: Innings,
    last_sequence: u64,
}

impl InningsEngine {
    /// Open a fresh innings.
    pub fn new(setup: &InningsSetup) -> Result<Self, EngineError> {
        Ok(Self {
            innings: create_innings(setup)?,
            last_sequence: 0,
        })
    }

    /// Resume from a stored snapshot. The snapshot must satisfy every
    /// invariant; `last_sequence` is the sequence of the last event it
    /// reflects.
    pub fn from_snapshot(innings: Innings, last_sequence: u64) -> Result<Self, EngineError> {
        validate_invariants(&innings)?;
        Ok(Self {
            innings,
            last_sequence,
        })
    }

    pub fn innings(&self) -> &Innings {
        &self.innings
    }

    pub fn into_innings(self) -> Innings {
        self.innings
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Apply a single envelope:
    ///   1. Validate schema version (must be 1)
    ///   2. Validate sequence (strictly increasing, no gaps)
    ///   3. Delegate to transitions::apply_event
    ///   4. Validate invariants on the new snapshot
    ///   5. Commit and return
    ///
    /// On any error the current snapshot is left exactly as it was.
    pub fn apply_event(&mut self, envelope: &EventEnvelope) -> Result<&Innings, EngineError> {
        if envelope.schema_version != SCHEMA_VERSION {
            return Err(EngineError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                got: envelope.schema_version,
            });
        }

        let expected = self.last_sequence + 1;
        if envelope.sequence != expected {
            return Err(EngineError::SequenceViolation {
                expected,
                got: envelope.sequence,
            });
        }

        let next = transition_apply(&self.innings, &envelope.event)
            .and_then(|next| validate_invariants(&next).map(|()| next))
            .inspect_err(|err| {
                warn!(
                    sequence = envelope.sequence,
                    event = envelope.event.name(),
                    error = %err,
                    "event rejected"
                );
            })?;

        debug!(
            sequence = envelope.sequence,
            event = envelope.event.name(),
            over = next.current_over,
            ball = next.current_ball,
            total = next.total_runs,
            wickets = next.wickets,
            "event applied"
        );

        self.innings = next;
        self.last_sequence = envelope.sequence;
        Ok(&self.innings)
    }

    /// Apply `event` as the next event in sequence.
    pub fn apply(&mut self, event: DeliveryEvent) -> Result<&Innings, EngineError> {
        let envelope = EventEnvelope::new(self.last_sequence + 1, event);
        self.apply_event(&envelope)
    }

    /// Apply an ordered sequence of envelopes, stopping at the first error.
    pub fn apply_sequence(&mut self, events: &[EventEnvelope]) -> Result<&Innings, EngineError> {
        for event in events {
            self.apply_event(event)?;
        }
        Ok(&self.innings)
    }

    /// Event-sourced reconstruction: open the innings and replay.
    pub fn replay(setup: &InningsSetup, events: &[EventEnvelope]) -> Result<Self, EngineError> {
        let mut engine = Self::new(setup)?;
        engine.apply_sequence(events)?;
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Wicket, WicketType};
    use crate::state::fixtures;

    fn runs(runs: u32, batsman: &str) -> DeliveryEvent {
        DeliveryEvent::Runs {
            runs,
            batsman: batsman.to_string(),
        }
    }

    #[test]
    fn sequence_gaps_are_rejected() {
        let mut engine = InningsEngine::new(&fixtures::setup()).unwrap();
        let err = engine
            .apply_event(&EventEnvelope::new(2, runs(1, "A")))
            .unwrap_err();
        assert_eq!(err, EngineError::SequenceViolation { expected: 1, got: 2 });
        assert_eq!(engine.last_sequence(), 0);
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let mut engine = InningsEngine::new(&fixtures::setup()).unwrap();
        let mut env = EventEnvelope::new(1, runs(1, "A"));
        env.schema_version = 99;
        assert_eq!(
            engine.apply_event(&env).unwrap_err(),
            EngineError::SchemaMismatch { expected: 1, got: 99 }
        );
    }

    #[test]
    fn rejected_event_does_not_advance_sequence() {
        let mut engine = InningsEngine::new(&fixtures::setup()).unwrap();
        engine.apply(DeliveryEvent::NoBall { batsman: "A".to_string() }).unwrap();
        let before = engine.innings().clone();

        let lbw = DeliveryEvent::Wicket {
            wicket: Wicket::new(WicketType::Lbw, "A"),
            next_player: None,
        };
        assert!(matches!(
            engine.apply(lbw),
            Err(EngineError::FreeHitDismissal { .. })
        ));
        assert_eq!(engine.innings(), &before);
        assert_eq!(engine.last_sequence(), 1);
    }

    #[test]
    fn replay_rebuilds_the_same_snapshot() {
        let events = EventEnvelope::sequence_all(vec![
            runs(1, "A"),
            runs(4, "B"),
            DeliveryEvent::Wide { batsman: "B".to_string() },
            DeliveryEvent::Undo,
            runs(2, "B"),
        ]);
        let a = InningsEngine::replay(&fixtures::setup(), &events).unwrap();
        let b = InningsEngine::replay(&fixtures::setup(), &events).unwrap();
        assert_eq!(a.innings(), b.innings());
        assert_eq!(a.innings().total_runs, 7);
        assert_eq!(a.last_sequence(), 5);
    }

    #[test]
    fn from_snapshot_validates() {
        let mut inn = fixtures::innings();
        inn.total_runs = 3;
        assert!(InningsEngine::from_snapshot(inn, 0).is_err());
    }
}
