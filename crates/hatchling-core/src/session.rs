//! The simulation context: one pet, its cooldowns, and its storage slot.
//!
//! A [`Session`] owns the live [`Pet`] and is the only thing that mutates
//! it. Every operation reads the time from the session's [`Clock`], applies
//! the pure logic from `hatchling-pet`, and saves the whole pet to its slot
//! when something changed.
//!
//! # Opening a session
//!
//! 1. Read the slot. A missing, non-object, or unparseable slot yields a
//!    fresh egg (logged at `warn` unless simply missing).
//! 2. Overlay the stored fields onto a fresh pet and re-stamp the version.
//! 3. Catch up: replay the ticks missed since `lastUpdate`, each stamped
//!    `lastUpdate + k * interval`, stopping early at a freeze or the cap.
//! 4. Save once.

use hatchling_pet::lifecycle::{self, Acknowledgment};
use hatchling_pet::record;
use hatchling_pet::{ActionGate, Pet, PetConfig, RecordError, Rejection, TickEffects, TickReport};
use hatchling_store::{SnapshotStore, StoreError};
use hatchling_types::PetSnapshot;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::{HatchlingConfig, ScheduleConfig};

/// Errors from persisting or restoring the pet.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The snapshot store failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The pet could not be turned into a record.
    #[error("record error: {source}")]
    Record {
        /// The underlying record error.
        #[from]
        source: RecordError,
    },
}

/// What an accepted operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// One tick of decay ran.
    Ticked(TickEffects),
    /// Food was given.
    Fed,
    /// The pet was petted.
    Petted,
    /// A clean was performed (with or without a mess to remove).
    Cleaned,
    /// The pet was named; the naming step is still pending.
    Named,
    /// A stage boundary was acknowledged.
    Acknowledged(Acknowledgment),
    /// The pause flag now has this value.
    PauseToggled {
        /// Whether the pet is now paused.
        paused: bool,
    },
    /// The pet was replaced by a fresh egg on request.
    Reset,
}

/// Result of a session operation: applied, or rejected with nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation changed the pet and it was saved.
    Applied(Effect),
    /// The operation did nothing.
    Rejected(Rejection),
}

impl Outcome {
    /// Whether the operation was applied.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Summary of a catch-up replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatchUp {
    /// Whole tick intervals elapsed since `lastUpdate`.
    pub elapsed_ticks: u64,
    /// Ticks actually applied.
    pub applied_ticks: u64,
    /// The replay stopped at `max_catch_up_ticks`.
    pub capped: bool,
}

/// How the pet was obtained when the session opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Restored from the stored slot.
    Restored,
    /// The slot was empty; a new egg was found.
    Fresh,
    /// The slot was unreadable; a new egg replaced it.
    Recovered,
}

/// Everything reported by [`Session::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opened {
    /// Where the pet came from.
    pub origin: Origin,
    /// The catch-up that ran after loading.
    pub catch_up: CatchUp,
}

/// The live simulation context.
pub struct Session {
    pet: Pet,
    gate: ActionGate,
    pet_config: PetConfig,
    schedule: ScheduleConfig,
    slot_key: String,
    store: Box<dyn SnapshotStore>,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pet", &self.pet)
            .field("gate", &self.gate)
            .field("slot_key", &self.slot_key)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Load the pet from its slot, catch up to the present, and save.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] if the slot cannot be read for a
    /// reason other than corrupt content, or if the save fails.
    pub fn open(
        config: &HatchlingConfig,
        store: Box<dyn SnapshotStore>,
        clock: Box<dyn Clock>,
    ) -> Result<(Self, Opened), SessionError> {
        let now = clock.now_ms();
        let slot_key = config.storage.slot_key.clone();
        let (pet, origin) = restore(store.as_ref(), &slot_key, &config.pet, now)?;

        let mut session = Self {
            pet,
            gate: ActionGate::new(),
            pet_config: config.pet.clone(),
            schedule: config.schedule.clone(),
            slot_key,
            store,
            clock,
        };
        let catch_up = session.catch_up(now);
        session.save()?;

        info!(
            ?origin,
            stage = %session.pet.life_stage(),
            name = session.pet.name(),
            elapsed_ticks = catch_up.elapsed_ticks,
            applied_ticks = catch_up.applied_ticks,
            "Session opened"
        );
        Ok((session, Opened { origin, catch_up }))
    }

    // -----------------------------------------------------------------------
    // Ticking
    // -----------------------------------------------------------------------

    /// Apply one tick at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn tick(&mut self) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        match hatchling_pet::tick(&mut self.pet, &self.pet_config, now) {
            TickReport::Applied(effects) => {
                self.save()?;
                Ok(Outcome::Applied(Effect::Ticked(effects)))
            }
            TickReport::Skipped(reason) => {
                debug!(%reason, "Tick skipped");
                Ok(Outcome::Rejected(reason))
            }
        }
    }

    /// Replay the ticks missed between `lastUpdate` and `now_ms` without
    /// saving.
    ///
    /// Replayed tick `k` is stamped `lastUpdate + k * interval`, so the
    /// fractional remainder carries into the next live tick. The replay
    /// stops at the first tick that is skipped (paused, frozen, dead) and
    /// never runs more than `max_catch_up_ticks`.
    pub fn catch_up(&mut self, now_ms: i64) -> CatchUp {
        let interval = i64::try_from(self.schedule.tick_interval_ms).unwrap_or(i64::MAX);
        let base = self.pet.last_update();
        let behind = now_ms.saturating_sub(base).max(0);
        let elapsed_ticks = behind
            .checked_div(interval)
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);

        let budget = elapsed_ticks.min(self.schedule.max_catch_up_ticks);
        let mut applied_ticks: u64 = 0;
        for k in 1..=budget {
            let offset = i64::try_from(k).unwrap_or(i64::MAX).saturating_mul(interval);
            let stamp = base.saturating_add(offset);
            if !hatchling_pet::tick(&mut self.pet, &self.pet_config, stamp).is_applied() {
                break;
            }
            applied_ticks = applied_ticks.saturating_add(1);
        }

        let capped = elapsed_ticks > budget && applied_ticks == budget;
        if capped {
            warn!(
                elapsed_ticks,
                max_catch_up_ticks = self.schedule.max_catch_up_ticks,
                "Catch-up capped"
            );
        }
        if elapsed_ticks > 0 {
            info!(elapsed_ticks, applied_ticks, "Caught up");
        }
        CatchUp {
            elapsed_ticks,
            applied_ticks,
            capped,
        }
    }

    // -----------------------------------------------------------------------
    // Owner actions
    // -----------------------------------------------------------------------

    /// Feed `amount` food.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn feed(&mut self, amount: i32) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        let result = self
            .gate
            .feed(&mut self.pet, &self.pet_config, amount, now)
            .map(|()| Effect::Fed);
        self.commit(result)
    }

    /// Pet the pet.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn pet(&mut self) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        let result = self
            .gate
            .pet(&mut self.pet, &self.pet_config, now)
            .map(|()| Effect::Petted);
        self.commit(result)
    }

    /// Clean up after the pet.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn clean(&mut self) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        let result = self
            .gate
            .clean(&mut self.pet, &self.pet_config, now)
            .map(|()| Effect::Cleaned);
        self.commit(result)
    }

    // -----------------------------------------------------------------------
    // Gate actions
    // -----------------------------------------------------------------------

    /// Acknowledge the pending stage boundary.
    ///
    /// Acknowledging death swaps in a fresh egg and fresh cooldowns.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn advance(&mut self) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        let result = lifecycle::advance(&mut self.pet, &self.pet_config, now);
        self.acknowledged(result)
    }

    /// Name the pet at the naming step.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn set_name(&mut self, name: &str) -> Result<Outcome, SessionError> {
        let result = lifecycle::set_name(&mut self.pet, name).map(|()| Effect::Named);
        self.commit(result)
    }

    /// Name the pet and acknowledge the naming step.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn name_and_advance(&mut self, name: &str) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        let result = lifecycle::name_and_advance(&mut self.pet, &self.pet_config, name, now);
        self.acknowledged(result)
    }

    // -----------------------------------------------------------------------
    // Owner controls
    // -----------------------------------------------------------------------

    /// Flip the pause flag.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn toggle_pause(&mut self) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        let paused = self.pet.toggle_pause(now);
        info!(paused, "Pause toggled");
        self.commit(Ok(Effect::PauseToggled { paused }))
    }

    /// Throw the pet away and start over with a fresh egg.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the save fails.
    pub fn reset(&mut self) -> Result<Outcome, SessionError> {
        let now = self.clock.now_ms();
        self.pet = Pet::new(&self.pet_config, now);
        self.gate = ActionGate::new();
        info!("Pet reset");
        self.commit(Ok(Effect::Reset))
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// The live pet.
    pub const fn pet_state(&self) -> &Pet {
        &self.pet
    }

    /// The owner action cooldowns.
    pub const fn gate(&self) -> &ActionGate {
        &self.gate
    }

    /// The pet mechanics in use.
    pub const fn pet_config(&self) -> &PetConfig {
        &self.pet_config
    }

    /// The heartbeat settings in use.
    pub const fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    /// The current time according to the session clock.
    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// A read-only view for renderers.
    pub fn snapshot(&self) -> PetSnapshot {
        self.pet.snapshot()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the whole pet to its slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the record cannot be built or written.
    pub fn save(&self) -> Result<(), SessionError> {
        let value = record::to_record(&self.pet)?;
        self.store.save(&self.slot_key, &value)?;
        Ok(())
    }

    fn commit(&self, result: Result<Effect, Rejection>) -> Result<Outcome, SessionError> {
        match result {
            Ok(effect) => {
                self.save()?;
                Ok(Outcome::Applied(effect))
            }
            Err(reason) => {
                debug!(%reason, "Operation rejected");
                Ok(Outcome::Rejected(reason))
            }
        }
    }

    fn acknowledged(
        &mut self,
        result: Result<Acknowledgment, Rejection>,
    ) -> Result<Outcome, SessionError> {
        if result == Ok(Acknowledgment::Replaced) {
            self.gate = ActionGate::new();
        }
        self.commit(result.map(Effect::Acknowledged))
    }
}

/// Read the slot and rebuild the pet, falling back to a fresh egg.
fn restore(
    store: &dyn SnapshotStore,
    key: &str,
    config: &PetConfig,
    now_ms: i64,
) -> Result<(Pet, Origin), SessionError> {
    match store.load(key) {
        Ok(Some(Value::Object(map))) => {
            let pet = record::from_record(&map, config, now_ms, &mut rand::rng());
            Ok((pet, Origin::Restored))
        }
        Ok(Some(other)) => {
            warn!(key, kind = json_kind(&other), "Stored pet is not an object, starting fresh");
            Ok((Pet::new(config, now_ms), Origin::Recovered))
        }
        Ok(None) => {
            info!(key, "No stored pet, a new egg appears");
            Ok((Pet::new(config, now_ms), Origin::Fresh))
        }
        Err(StoreError::Serialization { source, .. }) => {
            warn!(key, error = %source, "Stored pet is unreadable, starting fresh");
            Ok((Pet::new(config, now_ms), Origin::Recovered))
        }
        Err(e) => Err(e.into()),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
