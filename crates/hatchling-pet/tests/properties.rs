//! Invariants that must hold for any interleaving of ticks and owner
//! actions.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use hatchling_pet::{
    ActionGate, MAX_FOOD, MAX_HAPPINESS, MAX_MESS, Pet, PetConfig, advance, name_and_advance, tick,
};
use proptest::prelude::*;

const INTERVAL: i64 = 30_000;

#[derive(Debug, Clone)]
enum Op {
    Tick,
    Feed(i32),
    Pet,
    Clean,
    Acknowledge,
    Wait(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => Just(Op::Tick),
        2 => (-20i32..=60).prop_map(Op::Feed),
        2 => Just(Op::Pet),
        2 => Just(Op::Clean),
        1 => Just(Op::Acknowledge),
        1 => (0i64..=8 * 60 * 60 * 1_000).prop_map(Op::Wait),
    ]
}

/// Short stages so a run crosses every transition, including death.
fn short_lived() -> PetConfig {
    PetConfig {
        egg_time: 2,
        pup_time: 20,
        adult_time: 30,
        elder_time: 20,
        ..PetConfig::default()
    }
}

fn assert_bounds(pet: &Pet) -> Result<(), TestCaseError> {
    prop_assert!(
        (0..=MAX_HAPPINESS).contains(&pet.happiness()),
        "happiness out of range: {}",
        pet.happiness()
    );
    prop_assert!(pet.mess_counter() <= MAX_MESS, "mess out of range: {}", pet.mess_counter());
    prop_assert!(pet.food() >= 0, "food below zero: {}", pet.food());
    Ok(())
}

proptest! {
    #[test]
    fn needs_stay_in_bounds_for_any_sequence(
        ops in proptest::collection::vec(op(), 1..400),
    ) {
        let config = short_lived();
        let mut now = 0i64;
        let mut pet = Pet::new(&config, now);
        let mut gate = ActionGate::new();

        for op in ops {
            now += INTERVAL;
            let before = pet.clone();
            let mut fed = false;
            let applied = match op {
                Op::Tick => {
                    let applied = tick(&mut pet, &config, now).is_applied();
                    // Ticks only ever drain food.
                    prop_assert!(pet.food() <= before.food());
                    applied
                }
                Op::Feed(amount) => {
                    let applied = gate.feed(&mut pet, &config, amount, now).is_ok();
                    if applied {
                        fed = true;
                        prop_assert!(amount > 0);
                        prop_assert!(before.food() <= MAX_FOOD);
                        prop_assert!(pet.food() <= MAX_FOOD + amount);
                    }
                    applied
                }
                Op::Pet => gate.pet(&mut pet, &config, now).is_ok(),
                Op::Clean => gate.clean(&mut pet, &config, now).is_ok(),
                Op::Acknowledge => {
                    if pet.awaiting_name() {
                        name_and_advance(&mut pet, &config, "Pip", now).is_ok()
                    } else {
                        advance(&mut pet, &config, now).is_ok()
                    }
                }
                Op::Wait(ms) => {
                    now += ms;
                    true
                }
            };

            if !applied {
                prop_assert_eq!(&pet, &before, "a rejected operation changed the pet");
            }
            if pet.food() > MAX_FOOD {
                // Only a feed overshoot puts food above the cap.
                prop_assert!(fed || before.food() > MAX_FOOD);
            }
            assert_bounds(&pet)?;
        }
    }
}
