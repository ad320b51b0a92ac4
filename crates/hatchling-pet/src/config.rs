//! Tunable rates, thresholds, and cooldowns for pet mechanics.
//!
//! Range bounds that define the entity's invariants ([`MAX_FOOD`],
//! [`MAX_HAPPINESS`], [`MAX_MESS`]) are fixed constants. Everything that
//! shapes the pace of the simulation lives in [`PetConfig`] so callers
//! (the session, tests, the `pet:` section of `hatchling.yaml`) can override
//! defaults.

use hatchling_types::LifeStage;
use serde::Deserialize;

/// Record version stamped onto every pet on load.
pub const CURRENT_PET_VERSION: u32 = 1;

/// Upper bound for stored food (a feed may overshoot it transiently).
pub const MAX_FOOD: i32 = 100;

/// Upper bound for happiness. Never exceeded.
pub const MAX_HAPPINESS: i32 = 100;

/// Upper bound for outstanding messes.
pub const MAX_MESS: u32 = 5;

/// Configuration for pet mechanics applied per tick and per owner action.
///
/// Need rates are whole `i32` values applied once per tick. Modifiers named
/// `*_modifier` are added as-is, so penalties are negative. Stage durations
/// are in ticks; cooldowns are in wall-clock milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// Ticks of age added per tick (default: 1).
    pub aging_rate: u64,

    /// Food removed per tick outside the egg stage (default: 5).
    pub food_decay: i32,

    /// Potty countdown removed per tick outside the egg stage (default: 5).
    pub potty_decay: i32,

    /// Value the potty countdown resets to after every potty event (default: 100).
    pub potty_time: i32,

    /// Happiness removed per tick outside the egg stage (default: 1).
    pub happiness_decay: i32,

    /// Happiness added when the stomach runs empty (default: -5).
    pub happiness_empty_stomach_modifier: i32,

    /// Behavior added while happiness is at zero (default: -1).
    pub behavior_unhappy_modifier: i32,

    /// Happiness added per outstanding mess, every tick (default: -2).
    pub happiness_mess_modifier: i32,

    /// Behavior above which a potty event produces no mess (default: 15).
    pub trained_behavior_threshold: i32,

    /// Happiness granted by a feed that does not overfill (default: 10).
    pub feed_happiness: i32,

    /// Behavior granted by petting (default: 1).
    pub pet_increment: i32,

    /// Happiness granted by petting (default: 5).
    pub pet_happiness: i32,

    /// Happiness granted by cleaning up a mess (default: 10).
    pub clean_happiness: i32,

    /// Behavior gained and happiness lost when cleaning with nothing to
    /// clean (default: 2).
    pub clean_idle_penalty: i32,

    /// Ticks spent as an egg before hatching (default: 2).
    pub egg_time: u64,

    /// Ticks spent as a pup before growing up (default: 300).
    pub pup_time: u64,

    /// Ticks spent as an adult before becoming an elder (default: 900).
    pub adult_time: u64,

    /// Ticks spent as an elder before dying (default: 300).
    pub elder_time: u64,

    /// Minimum milliseconds between two accepted feeds (default: 4 hours).
    pub feed_cooldown_ms: u64,

    /// Minimum milliseconds between two accepted pets (default: 5 minutes).
    pub pet_cooldown_ms: u64,

    /// Minimum milliseconds between two accepted cleans (default: 2 hours).
    pub clean_cooldown_ms: u64,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            aging_rate: 1,
            food_decay: 5,
            potty_decay: 5,
            potty_time: 100,
            happiness_decay: 1,
            happiness_empty_stomach_modifier: -5,
            behavior_unhappy_modifier: -1,
            happiness_mess_modifier: -2,
            trained_behavior_threshold: 15,
            feed_happiness: 10,
            pet_increment: 1,
            pet_happiness: 5,
            clean_happiness: 10,
            clean_idle_penalty: 2,
            egg_time: 2,
            pup_time: 300,
            adult_time: 900,
            elder_time: 300,
            feed_cooldown_ms: 14_400_000,
            pet_cooldown_ms: 300_000,
            clean_cooldown_ms: 7_200_000,
        }
    }
}

impl PetConfig {
    /// Ticks a pet spends in `stage` before its next transition.
    ///
    /// Returns `None` for the terminal stage, which never times out.
    pub const fn stage_duration(&self, stage: LifeStage) -> Option<u64> {
        match stage {
            LifeStage::Egg => Some(self.egg_time),
            LifeStage::Pup => Some(self.pup_time),
            LifeStage::Adult => Some(self.adult_time),
            LifeStage::Elder => Some(self.elder_time),
            LifeStage::Dead => None,
        }
    }
}
