//! Read-only view of a pet handed to renderers after every mutating call.
//!
//! The snapshot is a plain copy: a renderer can hold on to it, serialize it,
//! or diff it against the previous one without ever touching the live pet.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{LifeStage, PetType};

/// A point-in-time copy of every pet attribute plus the derived flags a
/// renderer needs to decide which controls to enable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PetSnapshot {
    /// Record version the pet was last stamped with.
    pub version: u32,
    /// Current life stage.
    pub life_stage: LifeStage,
    /// False once the elder stage has timed out.
    pub alive: bool,
    /// Owner-toggled pause.
    pub paused: bool,
    /// A stage boundary was crossed and has not been acknowledged.
    pub needs_advancement: bool,
    /// Derived: `!paused && !needs_advancement`. Controls are enabled when true.
    pub can_update: bool,
    /// Derived: the pet is frozen at the pup naming step without a name.
    pub awaiting_name: bool,
    /// Owner-given name, empty until the naming step.
    pub name: String,
    /// Stored food.
    pub food: i32,
    /// Ticks spent in the current stage.
    #[ts(type = "number")]
    pub age: u64,
    /// Trained behavior score.
    pub behavior: i32,
    /// Countdown until the next potty event.
    pub potty_timer: i32,
    /// Outstanding messes.
    pub mess_counter: u32,
    /// Mood, always within `[0, MAX_HAPPINESS]`.
    pub happiness: i32,
    /// Milliseconds since epoch of the last successful tick.
    #[ts(type = "number")]
    pub last_update: i64,
    /// Milliseconds since epoch when the egg was found.
    #[ts(type = "number")]
    pub egg_found: i64,
    /// Milliseconds since epoch when the egg hatched.
    #[ts(type = "number")]
    pub hatched: i64,
    /// Creature type.
    #[serde(rename = "type")]
    pub pet_type: PetType,
    /// CSS-compatible color string.
    pub color: String,
    /// Horizontal scale factor for the sprite.
    pub scale_width: f64,
    /// Vertical scale factor for the sprite.
    pub scale_height: f64,
}
