//! Enumeration types for the Hatchling simulation.
//!
//! Life stages, creature types, and the owner actions that are subject to
//! cooldowns.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Life stages
// ---------------------------------------------------------------------------

/// The ordered phases a creature passes through.
///
/// Variants are declared in life order, so the derived [`Ord`] matches the
/// direction of progression: a stage never compares less than the stage it
/// came from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum LifeStage {
    /// Freshly found; no needs decay yet.
    #[default]
    Egg,
    /// Hatched and waiting for (or carrying) a name.
    Pup,
    /// Fully grown.
    Adult,
    /// Old age; the last living stage.
    Elder,
    /// Terminal. Nothing ticks until the owner acknowledges.
    Dead,
}

impl LifeStage {
    /// Every stage, in life order.
    pub const ALL: [Self; 5] = [Self::Egg, Self::Pup, Self::Adult, Self::Elder, Self::Dead];

    /// Whether this is the terminal stage.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Whether needs (food, potty, happiness) decay in this stage.
    pub const fn has_needs(self) -> bool {
        !matches!(self, Self::Egg)
    }
}

impl core::fmt::Display for LifeStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Egg => write!(f, "egg"),
            Self::Pup => write!(f, "pup"),
            Self::Adult => write!(f, "adult"),
            Self::Elder => write!(f, "elder"),
            Self::Dead => write!(f, "dead"),
        }
    }
}

// ---------------------------------------------------------------------------
// Cosmetics
// ---------------------------------------------------------------------------

/// The kind of creature that hatches. Purely cosmetic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PetType {
    /// A round, featureless blob.
    #[default]
    Blob,
    /// A small dog.
    Dog,
    /// A small cat.
    Cat,
    /// A long-eared bunny.
    Bunny,
    /// A tiny dragon.
    Dragon,
}

impl PetType {
    /// Every creature type, used when rolling cosmetics.
    pub const ALL: [Self; 5] = [Self::Blob, Self::Dog, Self::Cat, Self::Bunny, Self::Dragon];
}

// ---------------------------------------------------------------------------
// Owner actions
// ---------------------------------------------------------------------------

/// An owner action guarded by its own cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PetAction {
    /// Give the pet food.
    Feed,
    /// Pet the pet.
    Pet,
    /// Clean up after the pet.
    Clean,
}

impl core::fmt::Display for PetAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Feed => write!(f, "feed"),
            Self::Pet => write!(f, "pet"),
            Self::Clean => write!(f, "clean"),
        }
    }
}
