//! Per-tick need decay and consequences.
//!
//! [`tick`] advances a pet by one discrete slice of simulated time. It is a
//! no-op unless the pet is alive, not paused, and not frozen at a stage
//! boundary.
//!
//! # Order of operations
//!
//! 1. Stamp `last_update`, add `aging_rate` to age
//! 2. Outside the egg stage: decay food, potty countdown, happiness
//! 3. Empty stomach: floor food at 0 and apply the empty-stomach penalty
//! 4. Happiness at 0: behavior slides by the unhappy modifier
//! 5. Potty countdown below 0: potty event, countdown reset
//! 6. Happiness penalty per outstanding mess
//! 7. At most one stage transition on the post-update age
//!
//! Persisting the result is the caller's job.

use tracing::debug;

use crate::config::PetConfig;
use crate::lifecycle::{self, Transition};
use crate::pet::Pet;
use crate::rejection::Rejection;

/// What happened at a potty event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PottyEvent {
    /// Behavior was good enough; no mess.
    Trained,
    /// A mess was made (the counter may already have been at its cap).
    Mess,
}

/// Side effects of one applied tick, for logging and renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickEffects {
    /// The stomach ran empty this tick.
    pub stomach_empty: bool,
    /// A potty event fired this tick.
    pub potty: Option<PottyEvent>,
    /// The stage changed this tick.
    pub transition: Option<Transition>,
}

/// Result of calling [`tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// Preconditions were not met; the pet is untouched.
    Skipped(Rejection),
    /// The tick ran.
    Applied(TickEffects),
}

impl TickReport {
    /// Whether the tick actually ran.
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// The transition applied by this tick, if any.
    pub const fn transition(&self) -> Option<Transition> {
        match self {
            Self::Applied(effects) => effects.transition,
            Self::Skipped(_) => None,
        }
    }
}

/// Apply one tick of need decay and stage progression to `pet`.
pub fn tick(pet: &mut Pet, config: &PetConfig, now_ms: i64) -> TickReport {
    if let Err(reason) = pet.check_updatable() {
        return TickReport::Skipped(reason);
    }

    let mut effects = TickEffects::default();

    // 1. Time and age
    pet.last_update = now_ms;
    pet.age = pet.age.saturating_add(config.aging_rate);

    // 2-3. Needs decay (eggs have none)
    if pet.life_stage.has_needs() {
        let emptied = pet.drain_food(config.food_decay);
        pet.potty_timer = pet.potty_timer.saturating_sub(config.potty_decay);
        pet.adjust_happiness(config.happiness_decay.saturating_neg());

        if emptied {
            pet.adjust_happiness(config.happiness_empty_stomach_modifier);
            effects.stomach_empty = true;
        }
    }

    // 4. Unhappiness erodes behavior
    if pet.happiness() <= 0 {
        pet.behavior = pet.behavior.saturating_add(config.behavior_unhappy_modifier);
    }

    // 5. Potty
    if pet.potty_timer < 0 {
        effects.potty = Some(go_potty(pet, config));
    }

    // 6. Outstanding messes
    let messes = i32::try_from(pet.mess_counter()).unwrap_or(i32::MAX);
    pet.adjust_happiness(config.happiness_mess_modifier.saturating_mul(messes));

    // 7. Stage progression
    effects.transition = lifecycle::evaluate_transition(pet, config, now_ms);

    debug!(
        stage = %pet.life_stage,
        age = pet.age,
        food = pet.food(),
        happiness = pet.happiness(),
        behavior = pet.behavior,
        potty_timer = pet.potty_timer,
        mess = pet.mess_counter(),
        "Tick applied"
    );
    TickReport::Applied(effects)
}

/// Resolve a potty event and reset the countdown.
fn go_potty(pet: &mut Pet, config: &PetConfig) -> PottyEvent {
    let event = if pet.behavior > config.trained_behavior_threshold {
        PottyEvent::Trained
    } else {
        pet.set_mess_counter(pet.mess_counter().saturating_add(1));
        PottyEvent::Mess
    };
    pet.potty_timer = config.potty_time;
    event
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use hatchling_types::LifeStage;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::{MAX_FOOD, MAX_HAPPINESS, MAX_MESS};

    fn egg(config: &PetConfig) -> Pet {
        let mut rng = SmallRng::seed_from_u64(3);
        Pet::with_rng(config, 0, &mut rng)
    }

    /// A named pup that has been acknowledged and is ticking.
    fn pup(config: &PetConfig) -> Pet {
        let mut pet = egg(config);
        pet.life_stage = LifeStage::Pup;
        pet.name = "Rex".to_owned();
        pet
    }

    #[test]
    fn egg_only_ages() {
        let config = PetConfig::default();
        let mut pet = egg(&config);
        let report = tick(&mut pet, &config, 30_000);
        assert!(report.is_applied());
        assert_eq!(pet.age(), 1);
        assert_eq!(pet.last_update(), 30_000);
        assert_eq!(pet.food(), MAX_FOOD);
        assert_eq!(pet.potty_timer(), 100);
        assert_eq!(pet.happiness(), MAX_HAPPINESS);
    }

    #[test]
    fn pup_needs_decay_each_tick() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        let _ = tick(&mut pet, &config, 1);
        assert_eq!(pet.food(), 95);
        assert_eq!(pet.potty_timer(), 95);
        assert_eq!(pet.happiness(), 99);
        assert_eq!(pet.age(), 1);
    }

    #[test]
    fn empty_stomach_is_floored_and_penalized() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.set_food(3);
        let report = tick(&mut pet, &config, 1);
        assert_eq!(pet.food(), 0);
        // 100 - 1 decay - 5 empty stomach
        assert_eq!(pet.happiness(), 94);
        assert!(matches!(
            report,
            TickReport::Applied(TickEffects {
                stomach_empty: true,
                ..
            })
        ));
    }

    #[test]
    fn food_exactly_drained_is_not_empty_penalty() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.set_food(5);
        let _ = tick(&mut pet, &config, 1);
        assert_eq!(pet.food(), 0);
        assert_eq!(pet.happiness(), 99);
    }

    #[test]
    fn unhappiness_erodes_behavior() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.behavior = 4;
        pet.set_happiness(1);
        let _ = tick(&mut pet, &config, 1);
        assert_eq!(pet.happiness(), 0);
        assert_eq!(pet.behavior(), 3);
    }

    #[test]
    fn untrained_potty_makes_a_mess() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.potty_timer = 4;
        let report = tick(&mut pet, &config, 1);
        assert_eq!(pet.mess_counter(), 1);
        assert_eq!(pet.potty_timer(), config.potty_time);
        // 100 - 1 decay - 2 for the new mess
        assert_eq!(pet.happiness(), 97);
        assert!(matches!(
            report,
            TickReport::Applied(TickEffects {
                potty: Some(PottyEvent::Mess),
                ..
            })
        ));
    }

    #[test]
    fn trained_potty_is_clean() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.behavior = config.trained_behavior_threshold + 1;
        pet.potty_timer = 0;
        let _ = tick(&mut pet, &config, 1);
        assert_eq!(pet.mess_counter(), 0);
        assert_eq!(pet.potty_timer(), config.potty_time);
    }

    #[test]
    fn behavior_at_threshold_is_not_trained() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.behavior = config.trained_behavior_threshold;
        pet.potty_timer = 0;
        let _ = tick(&mut pet, &config, 1);
        assert_eq!(pet.mess_counter(), 1);
    }

    #[test]
    fn mess_counter_caps_at_max() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.set_mess_counter(MAX_MESS);
        pet.potty_timer = 0;
        let report = tick(&mut pet, &config, 1);
        assert_eq!(pet.mess_counter(), MAX_MESS);
        assert!(matches!(
            report,
            TickReport::Applied(TickEffects {
                potty: Some(PottyEvent::Mess),
                ..
            })
        ));
    }

    #[test]
    fn mess_penalty_scales_with_outstanding_mess() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.set_mess_counter(3);
        let _ = tick(&mut pet, &config, 1);
        // 100 - 1 decay - 3 * 2
        assert_eq!(pet.happiness(), 93);
    }

    #[test]
    fn overshoot_decays_without_being_clamped() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.top_up_food(10);
        let _ = tick(&mut pet, &config, 1);
        assert_eq!(pet.food(), MAX_FOOD + 5);
    }

    #[test]
    fn frozen_pet_is_untouched() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.needs_advancement = true;
        let before = pet.clone();
        let report = tick(&mut pet, &config, 99_999);
        assert_eq!(report, TickReport::Skipped(Rejection::AwaitingAdvancement));
        assert_eq!(pet, before);
    }

    #[test]
    fn paused_and_dead_pets_are_untouched() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        pet.paused = true;
        let before = pet.clone();
        assert_eq!(
            tick(&mut pet, &config, 5),
            TickReport::Skipped(Rejection::Paused)
        );
        assert_eq!(pet, before);

        pet.paused = false;
        pet.alive = false;
        let before = pet.clone();
        assert_eq!(tick(&mut pet, &config, 5), TickReport::Skipped(Rejection::Dead));
        assert_eq!(pet, before);
    }

    #[test]
    fn egg_hatches_after_egg_time() {
        let config = PetConfig::default();
        let mut pet = egg(&config);
        let first = tick(&mut pet, &config, 1);
        assert_eq!(first.transition(), None);
        let second = tick(&mut pet, &config, 2);
        assert_eq!(
            second.transition(),
            Some(Transition {
                from: LifeStage::Egg,
                to: LifeStage::Pup
            })
        );
        assert_eq!(pet.life_stage(), LifeStage::Pup);
        assert_eq!(pet.age(), 0);
        assert!(pet.needs_advancement());
    }

    #[test]
    fn bounds_hold_over_a_neglected_life() {
        let config = PetConfig::default();
        let mut pet = pup(&config);
        let mut last_stage = pet.life_stage();
        for now in 0..5_000_i64 {
            let report = tick(&mut pet, &config, now);
            assert!((0..=MAX_HAPPINESS).contains(&pet.happiness()));
            assert!(pet.mess_counter() <= MAX_MESS);
            assert!((0..=MAX_FOOD).contains(&pet.food()));
            assert!(pet.life_stage() >= last_stage);
            if report.transition().is_some() {
                assert_eq!(pet.age(), 0);
            }
            if !pet.is_alive() {
                break;
            }
            if pet.needs_advancement() {
                let _ = lifecycle::advance(&mut pet, &config, now);
            }
            last_stage = pet.life_stage();
        }
        assert_eq!(pet.life_stage(), LifeStage::Dead);
        assert!(pet.behavior() < 0);
    }
}
