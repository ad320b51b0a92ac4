//! Reasons an operation was skipped.
//!
//! Every guard in the simulation is a silent no-op: when a precondition is
//! not met, nothing changes and the caller gets a [`Rejection`] saying why.
//! Rejections are ordinary values, not errors.

use hatchling_types::PetAction;

/// Why a tick, owner action, or gate action did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The pet has died; only acknowledgment or reset do anything.
    Dead,
    /// The owner paused the simulation.
    Paused,
    /// A stage boundary is waiting for acknowledgment.
    AwaitingAdvancement,
    /// The action was accepted too recently.
    CoolingDown {
        /// The action that was refused.
        action: PetAction,
        /// Milliseconds until it will be accepted again.
        remaining_ms: u64,
    },
    /// Food is already above the cap.
    FoodOverCap,
    /// A feed must give at least one unit of food.
    NothingToEat,
    /// There is no stage boundary to acknowledge.
    NothingPending,
    /// The pup naming step cannot be left without a name.
    NameRequired,
    /// Names can only be given at the pup naming step.
    NotNamingStep,
    /// The pet already has a name.
    NameAlreadySet,
    /// The supplied name is empty or whitespace.
    EmptyName,
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dead => write!(f, "the pet has died"),
            Self::Paused => write!(f, "the simulation is paused"),
            Self::AwaitingAdvancement => write!(f, "waiting for the owner to acknowledge"),
            Self::CoolingDown {
                action,
                remaining_ms,
            } => write!(f, "{action} is cooling down for another {remaining_ms} ms"),
            Self::FoodOverCap => write!(f, "the pet is already full"),
            Self::NothingToEat => write!(f, "a feed needs at least one bite of food"),
            Self::NothingPending => write!(f, "nothing to acknowledge"),
            Self::NameRequired => write!(f, "the pet needs a name first"),
            Self::NotNamingStep => write!(f, "names are given when the egg hatches"),
            Self::NameAlreadySet => write!(f, "the pet already has a name"),
            Self::EmptyName => write!(f, "the name is empty"),
        }
    }
}
