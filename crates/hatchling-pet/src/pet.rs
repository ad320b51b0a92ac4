//! The pet entity and its invariant guards.
//!
//! [`Pet`] is the only entity in the simulation. Its range-bound needs
//! (`happiness`, `food`, `mess_counter`) are private and written only through
//! the setters below, which clamp at the moment of assignment. No reader can
//! ever see an out-of-range happiness or mess count.
//!
//! The remaining fields are crate-visible so the tick engine, gates, and
//! record schema in this crate can mutate them directly; everything outside
//! the crate reads through accessors.

use hatchling_types::{LifeStage, PetSnapshot, PetType};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::{CURRENT_PET_VERSION, MAX_FOOD, MAX_HAPPINESS, MAX_MESS, PetConfig};
use crate::rejection::Rejection;

/// Lowest and highest sprite scale, in hundredths.
const SCALE_RANGE_PCT: core::ops::RangeInclusive<u32> = 85..=115;

/// The virtual creature.
///
/// Created with [`Pet::new`] (or [`Pet::with_rng`] for deterministic
/// cosmetics), mutated by [`vitals::tick`](crate::vitals::tick), the owner
/// actions in [`actions`](crate::actions), and the gate in
/// [`lifecycle`](crate::lifecycle).
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub(crate) version: u32,
    pub(crate) life_stage: LifeStage,
    pub(crate) alive: bool,
    pub(crate) paused: bool,
    pub(crate) needs_advancement: bool,
    pub(crate) name: String,
    food: i32,
    pub(crate) age: u64,
    pub(crate) behavior: i32,
    pub(crate) potty_timer: i32,
    mess_counter: u32,
    happiness: i32,
    pub(crate) last_update: i64,
    pub(crate) egg_found: i64,
    pub(crate) hatched: i64,
    pub(crate) pet_type: PetType,
    pub(crate) color: String,
    pub(crate) scale_width: f64,
    pub(crate) scale_height: f64,
}

impl Pet {
    /// Create a freshly found egg with random cosmetics.
    pub fn new(config: &PetConfig, now_ms: i64) -> Self {
        Self::with_rng(config, now_ms, &mut rand::rng())
    }

    /// Create a freshly found egg, rolling cosmetics from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: &PetConfig, now_ms: i64, rng: &mut R) -> Self {
        let pet_type = PetType::ALL.choose(rng).copied().unwrap_or_default();
        let hue = rng.random_range(0_u32..360);

        Self {
            version: CURRENT_PET_VERSION,
            life_stage: LifeStage::Egg,
            alive: true,
            paused: false,
            needs_advancement: false,
            name: String::new(),
            food: MAX_FOOD,
            age: 0,
            behavior: 0,
            potty_timer: config.potty_time,
            mess_counter: 0,
            happiness: MAX_HAPPINESS,
            last_update: now_ms,
            egg_found: now_ms,
            hatched: now_ms,
            pet_type,
            color: format!("hsl({hue}, 70%, 65%)"),
            scale_width: roll_scale(rng),
            scale_height: roll_scale(rng),
        }
    }

    // -----------------------------------------------------------------------
    // Guarded needs
    // -----------------------------------------------------------------------

    /// Assign happiness, clamped to `[0, MAX_HAPPINESS]`.
    pub fn set_happiness(&mut self, happiness: i32) {
        self.happiness = happiness.clamp(0, MAX_HAPPINESS);
    }

    /// Add `delta` to happiness through the clamp.
    pub fn adjust_happiness(&mut self, delta: i32) {
        self.set_happiness(self.happiness.saturating_add(delta));
    }

    /// Assign food, clamped to `[0, MAX_FOOD]`.
    pub fn set_food(&mut self, food: i32) {
        self.food = food.clamp(0, MAX_FOOD);
    }

    /// Assign the mess count, clamped to `[0, MAX_MESS]`.
    pub fn set_mess_counter(&mut self, mess_counter: u32) {
        self.mess_counter = mess_counter.min(MAX_MESS);
    }

    /// Add food without capping at [`MAX_FOOD`]. Only the floor at 0 applies.
    pub(crate) fn top_up_food(&mut self, amount: i32) {
        self.food = self.food.saturating_add(amount).max(0);
    }

    /// Remove food, flooring at 0. Returns `true` when the stomach ran
    /// empty (the unclamped result would have been negative).
    pub(crate) fn drain_food(&mut self, amount: i32) -> bool {
        let remaining = self.food.saturating_sub(amount);
        self.food = remaining.max(0);
        remaining < 0
    }

    /// Overwrite food from a persisted record, flooring at 0. A feed
    /// overshoot survives.
    pub(crate) fn restore_food(&mut self, food: i32) {
        self.food = food.max(0);
    }

    // -----------------------------------------------------------------------
    // Owner toggles
    // -----------------------------------------------------------------------

    /// Flip the pause flag. Returns the new value.
    ///
    /// Unpausing rebases `last_update` to `now_ms`: paused time is never
    /// replayed by catch-up.
    pub const fn toggle_pause(&mut self, now_ms: i64) -> bool {
        self.paused = !self.paused;
        if !self.paused {
            self.last_update = now_ms;
        }
        self.paused
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    /// Whether owner controls should be enabled: not paused and not frozen
    /// at a stage boundary.
    pub const fn can_update(&self) -> bool {
        !self.paused && !self.needs_advancement
    }

    /// Whether the pet is frozen at the pup naming step without a name.
    pub fn awaiting_name(&self) -> bool {
        self.needs_advancement && self.life_stage == LifeStage::Pup && self.name.is_empty()
    }

    /// Check the shared precondition of ticks and owner actions.
    ///
    /// # Errors
    ///
    /// Returns the first unmet condition: dead, frozen at a boundary, or paused.
    pub const fn check_updatable(&self) -> Result<(), Rejection> {
        if !self.alive {
            return Err(Rejection::Dead);
        }
        if self.needs_advancement {
            return Err(Rejection::AwaitingAdvancement);
        }
        if self.paused {
            return Err(Rejection::Paused);
        }
        Ok(())
    }

    /// Copy every attribute into a read-only [`PetSnapshot`].
    pub fn snapshot(&self) -> PetSnapshot {
        PetSnapshot {
            version: self.version,
            life_stage: self.life_stage,
            alive: self.alive,
            paused: self.paused,
            needs_advancement: self.needs_advancement,
            can_update: self.can_update(),
            awaiting_name: self.awaiting_name(),
            name: self.name.clone(),
            food: self.food,
            age: self.age,
            behavior: self.behavior,
            potty_timer: self.potty_timer,
            mess_counter: self.mess_counter,
            happiness: self.happiness,
            last_update: self.last_update,
            egg_found: self.egg_found,
            hatched: self.hatched,
            pet_type: self.pet_type,
            color: self.color.clone(),
            scale_width: self.scale_width,
            scale_height: self.scale_height,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Record version.
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Current life stage.
    pub const fn life_stage(&self) -> LifeStage {
        self.life_stage
    }

    /// False once the elder stage has timed out.
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Owner-toggled pause.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// A stage boundary is waiting for acknowledgment.
    pub const fn needs_advancement(&self) -> bool {
        self.needs_advancement
    }

    /// Owner-given name; empty until the naming step.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored food.
    pub const fn food(&self) -> i32 {
        self.food
    }

    /// Ticks spent in the current stage.
    pub const fn age(&self) -> u64 {
        self.age
    }

    /// Trained behavior score.
    pub const fn behavior(&self) -> i32 {
        self.behavior
    }

    /// Countdown to the next potty event.
    pub const fn potty_timer(&self) -> i32 {
        self.potty_timer
    }

    /// Outstanding messes.
    pub const fn mess_counter(&self) -> u32 {
        self.mess_counter
    }

    /// Mood.
    pub const fn happiness(&self) -> i32 {
        self.happiness
    }

    /// Milliseconds since epoch of the last successful tick.
    pub const fn last_update(&self) -> i64 {
        self.last_update
    }

    /// Milliseconds since epoch when the egg was found.
    pub const fn egg_found(&self) -> i64 {
        self.egg_found
    }

    /// Milliseconds since epoch when the egg hatched.
    pub const fn hatched(&self) -> i64 {
        self.hatched
    }

    /// Creature type.
    pub const fn pet_type(&self) -> PetType {
        self.pet_type
    }

    /// Sprite color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Horizontal sprite scale.
    pub const fn scale_width(&self) -> f64 {
        self.scale_width
    }

    /// Vertical sprite scale.
    pub const fn scale_height(&self) -> f64 {
        self.scale_height
    }
}

fn roll_scale<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.random_range(SCALE_RANGE_PCT)) / 100.0
}
