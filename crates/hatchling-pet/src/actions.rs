//! Owner actions and their cooldowns.
//!
//! Each action passes the same checks in order before it touches the pet:
//!
//! 1. Updatable -- alive, not paused, no pending stage acknowledgment
//! 2. Cooldown -- enough time since this action was last accepted
//! 3. Action-specific -- only `feed` has one (food already over the cap)
//!
//! A rejected action changes nothing and does not restart its cooldown.
//! Cooldown timestamps belong to the session; they are not part of the
//! persisted pet.

use std::collections::BTreeMap;

use hatchling_types::PetAction;
use tracing::debug;

use crate::config::{MAX_FOOD, PetConfig};
use crate::pet::Pet;
use crate::rejection::Rejection;

/// Tracks when each owner action was last accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionGate {
    last_accepted: BTreeMap<PetAction, i64>,
}

impl ActionGate {
    /// A gate on which every action is immediately available.
    pub const fn new() -> Self {
        Self {
            last_accepted: BTreeMap::new(),
        }
    }

    /// Milliseconds until `action` is accepted again. 0 if available now.
    ///
    /// A clock that went backwards counts as no time elapsed.
    pub fn remaining_ms(&self, action: PetAction, config: &PetConfig, now_ms: i64) -> u64 {
        let Some(&last) = self.last_accepted.get(&action) else {
            return 0;
        };
        let elapsed = u64::try_from(now_ms.saturating_sub(last)).unwrap_or(0);
        cooldown_for(action, config).saturating_sub(elapsed)
    }

    /// Feed the pet `amount` food.
    ///
    /// Food may overshoot [`MAX_FOOD`]; happiness is only granted when it
    /// does not. Feeding a pet already over the cap, or feeding less than
    /// one unit, is rejected.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] if the feed was refused.
    pub fn feed(
        &mut self,
        pet: &mut Pet,
        config: &PetConfig,
        amount: i32,
        now_ms: i64,
    ) -> Result<(), Rejection> {
        self.check(PetAction::Feed, pet, config, now_ms)?;
        if amount <= 0 {
            return Err(rejected(PetAction::Feed, Rejection::NothingToEat));
        }
        if pet.food() > MAX_FOOD {
            return Err(rejected(PetAction::Feed, Rejection::FoodOverCap));
        }

        pet.top_up_food(amount);
        if pet.food() <= MAX_FOOD {
            pet.adjust_happiness(config.feed_happiness);
        }
        self.accept(PetAction::Feed, now_ms);
        Ok(())
    }

    /// Pet the pet: better behavior, happier mood.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] if petting was refused.
    pub fn pet(&mut self, pet: &mut Pet, config: &PetConfig, now_ms: i64) -> Result<(), Rejection> {
        self.check(PetAction::Pet, pet, config, now_ms)?;

        pet.behavior = pet.behavior.saturating_add(config.pet_increment);
        pet.adjust_happiness(config.pet_happiness);
        self.accept(PetAction::Pet, now_ms);
        Ok(())
    }

    /// Clean up one mess.
    ///
    /// With nothing to clean, behavior rises and happiness drops by
    /// `clean_idle_penalty` instead.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] if cleaning was refused.
    pub fn clean(
        &mut self,
        pet: &mut Pet,
        config: &PetConfig,
        now_ms: i64,
    ) -> Result<(), Rejection> {
        self.check(PetAction::Clean, pet, config, now_ms)?;

        if pet.mess_counter() > 0 {
            pet.set_mess_counter(pet.mess_counter().saturating_sub(1));
            pet.adjust_happiness(config.clean_happiness);
        } else {
            pet.behavior = pet.behavior.saturating_add(config.clean_idle_penalty);
            pet.adjust_happiness(config.clean_idle_penalty.saturating_neg());
        }
        self.accept(PetAction::Clean, now_ms);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pipeline stages
    // -----------------------------------------------------------------------

    fn check(
        &self,
        action: PetAction,
        pet: &Pet,
        config: &PetConfig,
        now_ms: i64,
    ) -> Result<(), Rejection> {
        if let Err(reason) = pet.check_updatable() {
            return Err(rejected(action, reason));
        }
        let remaining_ms = self.remaining_ms(action, config, now_ms);
        if remaining_ms > 0 {
            return Err(rejected(
                action,
                Rejection::CoolingDown {
                    action,
                    remaining_ms,
                },
            ));
        }
        Ok(())
    }

    fn accept(&mut self, action: PetAction, now_ms: i64) {
        self.last_accepted.insert(action, now_ms);
        debug!(%action, now_ms, "Action accepted");
    }
}

fn rejected(action: PetAction, reason: Rejection) -> Rejection {
    debug!(%action, %reason, "Action rejected");
    reason
}

const fn cooldown_for(action: PetAction, config: &PetConfig) -> u64 {
    match action {
        PetAction::Feed => config.feed_cooldown_ms,
        PetAction::Pet => config.pet_cooldown_ms,
        PetAction::Clean => config.clean_cooldown_ms,
    }
}
