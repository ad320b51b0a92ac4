//! Life-stage transitions and the owner acknowledgment gate.
//!
//! Stage progression is driven by [`TRANSITIONS`], a table keyed by the
//! current stage. When a pet's age in its stage reaches the configured
//! duration, the tick engine calls [`evaluate_transition`]: the pet moves
//! to the next stage, its age resets to 0, and it freezes with
//! `needs_advancement` set until the owner acknowledges via [`advance`].
//!
//! ```text
//!  Egg ──[egg_time]──▶ Pup ──[pup_time]──▶ Adult ──[adult_time]──▶ Elder ──[elder_time]──▶ Dead
//!        (naming step)
//! ```
//!
//! Acknowledging the pup naming step needs a non-empty name. Acknowledging
//! death replaces the pet with a fresh egg.

use hatchling_types::LifeStage;
use tracing::info;

use crate::config::PetConfig;
use crate::pet::Pet;
use crate::rejection::Rejection;

/// One row of the stage-transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRule {
    /// Stage the pet leaves.
    pub from: LifeStage,
    /// Stage the pet enters.
    pub to: LifeStage,
    /// Whether the stage entered starts with the naming step.
    pub naming_step: bool,
}

/// The stage-transition table, one row per non-terminal stage.
///
/// Durations come from [`PetConfig::stage_duration`] for `from`.
pub const TRANSITIONS: [StageRule; 4] = [
    StageRule {
        from: LifeStage::Egg,
        to: LifeStage::Pup,
        naming_step: true,
    },
    StageRule {
        from: LifeStage::Pup,
        to: LifeStage::Adult,
        naming_step: false,
    },
    StageRule {
        from: LifeStage::Adult,
        to: LifeStage::Elder,
        naming_step: false,
    },
    StageRule {
        from: LifeStage::Elder,
        to: LifeStage::Dead,
        naming_step: false,
    },
];

/// A stage change applied during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Stage before the tick.
    pub from: LifeStage,
    /// Stage after the tick.
    pub to: LifeStage,
}

/// What an accepted acknowledgment did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    /// The gate was cleared and ticking resumes in this stage.
    Resumed(LifeStage),
    /// Death was acknowledged; the pet was replaced with a fresh egg.
    Replaced,
}

/// Look up the rule for leaving `stage`. `None` for the terminal stage.
pub fn rule_leaving(stage: LifeStage) -> Option<&'static StageRule> {
    TRANSITIONS.iter().find(|rule| rule.from == stage)
}

/// Look up the rule that led into `stage`. `None` for the egg stage.
pub fn rule_entering(stage: LifeStage) -> Option<&'static StageRule> {
    TRANSITIONS.iter().find(|rule| rule.to == stage)
}

/// Apply at most one stage transition if the pet's age has reached the
/// duration of its current stage.
///
/// Called by the tick engine after needs have been updated, so the
/// comparison uses the post-update age.
pub(crate) fn evaluate_transition(
    pet: &mut Pet,
    config: &PetConfig,
    now_ms: i64,
) -> Option<Transition> {
    let rule = rule_leaving(pet.life_stage)?;
    let duration = config.stage_duration(rule.from)?;
    if pet.age < duration {
        return None;
    }

    pet.life_stage = rule.to;
    pet.age = 0;
    pet.needs_advancement = true;
    if rule.to.is_terminal() {
        pet.alive = false;
    }
    if rule.from == LifeStage::Egg {
        pet.hatched = now_ms;
    }

    info!(from = %rule.from, to = %rule.to, name = pet.name.as_str(), "Stage transition");
    Some(Transition {
        from: rule.from,
        to: rule.to,
    })
}

/// Acknowledge a pending stage boundary.
///
/// - Nothing pending: rejected with [`Rejection::NothingPending`].
/// - Pup naming step without a name: rejected with [`Rejection::NameRequired`].
/// - Dead: the pet is replaced by a fresh egg created at `now_ms`.
/// - Otherwise: `needs_advancement` is cleared and `last_update` rebased to
///   `now_ms`, so frozen time is never replayed by catch-up.
///
/// # Errors
///
/// Returns the [`Rejection`] when the acknowledgment is refused; the pet is
/// unchanged.
pub fn advance(
    pet: &mut Pet,
    config: &PetConfig,
    now_ms: i64,
) -> Result<Acknowledgment, Rejection> {
    if !pet.needs_advancement {
        return Err(Rejection::NothingPending);
    }

    if pet.life_stage.is_terminal() {
        info!(name = pet.name.as_str(), "Death acknowledged, a new egg appears");
        *pet = Pet::new(config, now_ms);
        return Ok(Acknowledgment::Replaced);
    }

    let naming_step = rule_entering(pet.life_stage).is_some_and(|rule| rule.naming_step);
    if naming_step && pet.name.is_empty() {
        return Err(Rejection::NameRequired);
    }

    pet.needs_advancement = false;
    pet.last_update = now_ms;
    info!(stage = %pet.life_stage, name = pet.name.as_str(), "Stage acknowledged");
    Ok(Acknowledgment::Resumed(pet.life_stage))
}

/// Give the pet its name at the pup naming step.
///
/// The name is trimmed and must not be empty. It does not clear the gate;
/// see [`name_and_advance`] for the combined operation.
///
/// # Errors
///
/// Returns [`Rejection::NotNamingStep`] outside the naming step,
/// [`Rejection::NameAlreadySet`] if the pet already has a name, or
/// [`Rejection::EmptyName`] for a blank name.
pub fn set_name(pet: &mut Pet, name: &str) -> Result<(), Rejection> {
    let at_naming_step = pet.needs_advancement
        && rule_entering(pet.life_stage).is_some_and(|rule| rule.naming_step);
    if !at_naming_step {
        return Err(Rejection::NotNamingStep);
    }
    if !pet.name.is_empty() {
        return Err(Rejection::NameAlreadySet);
    }
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Rejection::EmptyName);
    }

    trimmed.clone_into(&mut pet.name);
    info!(name = trimmed, "Pet named");
    Ok(())
}

/// Name the pet and acknowledge the naming step in one operation.
///
/// # Errors
///
/// Returns the first [`Rejection`] from [`set_name`] or [`advance`]. If
/// naming is refused the pet is unchanged.
pub fn name_and_advance(
    pet: &mut Pet,
    config: &PetConfig,
    name: &str,
    now_ms: i64,
) -> Result<Acknowledgment, Rejection> {
    set_name(pet, name)?;
    advance(pet, config, now_ms)
}
