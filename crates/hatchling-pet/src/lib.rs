//! Pet state, needs decay, life-stage gating, and owner actions for the
//! Hatchling simulation.
//!
//! This crate is the logic layer: everything that operates on the pet
//! without touching I/O or the clock. Callers pass the current time in
//! milliseconds. It sits between `hatchling-types` (plain data) and
//! `hatchling-core` (persistence, catch-up, and scheduling).
//!
//! # Modules
//!
//! - [`actions`] -- Owner actions (feed, pet, clean) and their cooldowns ([`ActionGate`])
//! - [`config`] -- Tunable rates, thresholds, and stage durations ([`PetConfig`])
//! - [`error`] -- Error types for record serialization ([`RecordError`])
//! - [`lifecycle`] -- Stage-transition table and the acknowledgment gate
//! - [`pet`] -- The pet entity with clamped need setters ([`Pet`])
//! - [`record`] -- The flat persisted record schema
//! - [`rejection`] -- Why an operation did nothing ([`Rejection`])
//! - [`vitals`] -- Per-tick need decay and consequences ([`tick`])

pub mod actions;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod pet;
pub mod record;
pub mod rejection;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use actions::ActionGate;
pub use config::{CURRENT_PET_VERSION, MAX_FOOD, MAX_HAPPINESS, MAX_MESS, PetConfig};
pub use error::RecordError;
pub use lifecycle::{Acknowledgment, Transition, advance, name_and_advance, set_name};
pub use pet::Pet;
pub use rejection::Rejection;
pub use vitals::{PottyEvent, TickEffects, TickReport, tick};
