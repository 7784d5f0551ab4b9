//! Session manager — one match, persist-after-apply semantics.
//!
//! A session owns the two match records and the store they live in.
//! Concurrency: `SharedSession` wraps a session in a Mutex; no global
//! mutable state.
//!
//! Apply-before-persist order:
//!   1. kernel computes the next innings (may reject; nothing changes)
//!   2. store.save(next records)       (may fail; nothing changes)
//!   3. commit in memory

use std::sync::{Mutex, PoisonError};

use tracing::{debug, info, warn};

use cricket_engine::completion::{is_innings_complete, MatchResult};
use cricket_engine::hashing::canonical_hash;
use cricket_engine::invariants::validate_invariants;
use cricket_engine::state::create_innings;
use cricket_engine::{DeliveryEvent, Innings, InningsEngine};

use crate::error::StoreError;
use crate::records::{InningsState, MatchConfig, TeamSide};
use crate::store::{load_record, save_record, KeyValueStore, INNINGS_STATE_KEY, MATCH_CONFIG_KEY};

/// A match and the store backing it.
pub struct MatchSession<S: KeyValueStore> {
    store: S,
    config: MatchConfig,
    state: InningsState,
}

impl<S: KeyValueStore> MatchSession<S> {
    /// Load both records from `store`, falling back to fresh defaults for
    /// whichever is absent. Every stored innings is re-validated.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let config: Option<MatchConfig> = load_record(&store, MATCH_CONFIG_KEY)?;
        let state: Option<InningsState> = load_record(&store, INNINGS_STATE_KEY)?;
        let restored = config.is_some() || state.is_some();

        let config = config.unwrap_or_default();
        let state = state.unwrap_or_default();
        state.validate()?;
        for innings in &state.innings {
            validate_invariants(innings)?;
        }

        info!(
            match_id = %config.match_id,
            innings = state.innings.len(),
            current = state.current_innings_index,
            restored,
            "session opened"
        );
        Ok(Self {
            store,
            config,
            state,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &InningsState {
        &self.state
    }

    pub fn current_innings(&self) -> Option<&Innings> {
        self.state.current()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Configuration ──────────────────────────────────────────────

    /// Edit the configuration record and persist it.
    pub fn update_config(
        &mut self,
        edit: impl FnOnce(&mut MatchConfig),
    ) -> Result<&MatchConfig, StoreError> {
        let mut next = self.config.clone();
        edit(&mut next);
        save_record(&mut self.store, MATCH_CONFIG_KEY, &next)?;
        self.config = next;
        debug!(match_id = %self.config.match_id, "config saved");
        Ok(&self.config)
    }

    // ── Innings management ─────────────────────────────────────────

    /// Open a new innings for `batting` from the configured rosters and
    /// select it. Requires a complete setup and toss.
    pub fn start_innings(
        &mut self,
        batting: TeamSide,
        on_strike: &str,
        off_strike: &str,
        bowler: &str,
    ) -> Result<usize, StoreError> {
        let setup = self
            .config
            .innings_setup(batting, on_strike, off_strike, bowler)?;
        let innings = create_innings(&setup)?;
        let index = self.add_innings(innings)?;
        info!(index, batting = %batting, bowler, "innings started");
        Ok(index)
    }

    /// Append an innings and select it.
    pub fn add_innings(&mut self, innings: Innings) -> Result<usize, StoreError> {
        validate_invariants(&innings)?;
        let mut next = self.state.clone();
        let index = next.add_innings(innings);
        self.commit(next)?;
        Ok(index)
    }

    pub fn delete_innings(&mut self, index: usize) -> Result<Innings, StoreError> {
        let mut next = self.state.clone();
        let removed = next.delete_innings(index)?;
        self.commit(next)?;
        info!(index, current = self.state.current_innings_index, "innings deleted");
        Ok(removed)
    }

    pub fn set_current_innings(&mut self, index: usize) -> Result<(), StoreError> {
        let mut next = self.state.clone();
        next.set_current_innings(index)?;
        self.commit(next)
    }

    /// Replace the innings at `index` wholesale. The replacement must be
    /// internally consistent.
    pub fn update_innings(&mut self, index: usize, innings: Innings) -> Result<(), StoreError> {
        validate_invariants(&innings)?;
        let mut next = self.state.clone();
        next.update_innings(index, innings)?;
        self.commit(next)
    }

    // ── Scoring ────────────────────────────────────────────────────

    /// Apply one scoring event to the selected innings, then persist.
    ///
    /// A kernel rejection or a failed save leaves the session unchanged.
    pub fn apply(&mut self, event: DeliveryEvent) -> Result<&Innings, StoreError> {
        let index = self.state.current_index().ok_or(StoreError::NoActiveInnings)?;
        let name = event.name();

        // Step 1: kernel (validates, transitions, re-checks invariants)
        let mut engine = InningsEngine::from_snapshot(self.state.innings[index].clone(), 0)?;
        engine.apply(event)?;

        // Step 2: persist (only if step 1 succeeded)
        let mut next = self.state.clone();
        next.innings[index] = engine.into_innings();
        self.commit(next).inspect_err(|err| {
            warn!(index, event = name, error = %err, "persist failed; event dropped");
        })?;

        let innings = &self.state.innings[index];
        debug!(
            index,
            event = name,
            total = innings.total_runs,
            wickets = innings.wickets,
            over = innings.current_over,
            ball = innings.current_ball,
            "event persisted"
        );
        Ok(innings)
    }

    /// Whether the selected innings is all out or has used its overs.
    /// `false` when no innings is selected.
    pub fn is_current_innings_complete(&self) -> bool {
        self.current_innings()
            .is_some_and(|inn| is_innings_complete(inn, self.config.rules.total_overs))
    }

    /// Result once two innings exist, decided on the first two.
    pub fn result(&self) -> Option<MatchResult> {
        let [first, second, ..] = self.state.innings.as_slice() else {
            return None;
        };
        Some(MatchResult::decide(
            first,
            second,
            self.config.team_name(&first.batting_team),
            self.config.team_name(&second.batting_team),
        ))
    }

    /// Canonical hash of the selected innings.
    pub fn current_hash(&self) -> Option<String> {
        self.current_innings().map(canonical_hash)
    }

    /// Throw the match away: fresh defaults, persisted immediately.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        let config = MatchConfig::default();
        let state = InningsState::default();
        save_record(&mut self.store, MATCH_CONFIG_KEY, &config)?;
        save_record(&mut self.store, INNINGS_STATE_KEY, &state)?;
        info!(old = %self.config.match_id, new = %config.match_id, "match reset");
        self.config = config;
        self.state = state;
        Ok(())
    }

    fn commit(&mut self, next: InningsState) -> Result<(), StoreError> {
        save_record(&mut self.store, INNINGS_STATE_KEY, &next)?;
        self.state = next;
        Ok(())
    }
}

/// Thread-safe session handle using Mutex.
///
/// Every write is serialized through the lock. A panic while the lock was
/// held cannot leave half-applied state behind (sessions only commit after
/// a successful save), so a poisoned lock is recovered rather than
/// propagated.
pub struct SharedSession<S: KeyValueStore> {
    inner: Mutex<MatchSession<S>>,
}

impl<S: KeyValueStore> SharedSession<S> {
    pub fn new(session: MatchSession<S>) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut MatchSession<S>) -> R) -> R {
        let mut session = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    /// Apply event under lock. Returns a copy of the updated innings.
    pub fn apply(&self, event: DeliveryEvent) -> Result<Innings, StoreError> {
        self.with(|s| s.apply(event).cloned())
    }

    /// Current hash under lock.
    pub fn current_hash(&self) -> Option<String> {
        self.with(|s| s.current_hash())
    }

    /// Copy of the innings records under lock.
    pub fn state(&self) -> InningsState {
        self.with(|s| s.state().clone())
    }

    pub fn into_inner(self) -> MatchSession<S> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
