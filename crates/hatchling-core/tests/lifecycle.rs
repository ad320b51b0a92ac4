//! End-to-end pet lifecycle tests across sessions.
//!
//! Each test drives a [`Session`] with a [`ManualClock`] against an
//! in-memory or on-disk store, closing and reopening it to exercise the
//! load and catch-up path.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::sync::Arc;

use hatchling_core::{
    CatchUp, Effect, HatchlingConfig, ManualClock, Origin, Outcome, Session,
};
use hatchling_pet::lifecycle::Acknowledgment;
use hatchling_pet::{Rejection, record};
use hatchling_store::{JsonFileStore, MemoryStore, SnapshotStore};
use hatchling_types::LifeStage;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const T0: i64 = 1_700_000_000_000;
const INTERVAL: i64 = 30_000;

fn open(config: &HatchlingConfig, store: &Arc<MemoryStore>, clock: &ManualClock) -> Session {
    let (session, _) = Session::open(config, Box::new(Arc::clone(store)), Box::new(clock.clone()))
        .unwrap();
    session
}

/// Hatch and name a pet, leaving it ticking as a pup at the clock's time.
fn named_pup(config: &HatchlingConfig, store: &Arc<MemoryStore>, clock: &ManualClock) -> Session {
    let mut session = open(config, store, clock);
    for _ in 0..config.pet.egg_time {
        clock.advance(INTERVAL);
        session.tick().unwrap();
    }
    assert!(session.pet_state().awaiting_name());
    let outcome = session.name_and_advance("Rex").unwrap();
    assert_eq!(
        outcome,
        Outcome::Applied(Effect::Acknowledged(Acknowledgment::Resumed(LifeStage::Pup)))
    );
    session
}

#[test]
fn reopening_after_five_intervals_matches_five_ticks() {
    let config = HatchlingConfig::default();
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(T0);
    let session = named_pup(&config, &store, &clock);
    let saved_at = session.pet_state().last_update();
    drop(session);

    // Reference: five ticks applied by hand to the stored record.
    let stored = store.load("pet").unwrap().unwrap();
    let mut rng = SmallRng::seed_from_u64(1);
    let mut expected =
        record::from_record(stored.as_object().unwrap(), &config.pet, saved_at, &mut rng);
    for k in 1..=5 {
        let report = hatchling_pet::tick(&mut expected, &config.pet, saved_at + k * INTERVAL);
        assert!(report.is_applied());
    }

    // Reopen at T + 5I plus a remainder shorter than one interval.
    clock.set(saved_at + 5 * INTERVAL + INTERVAL / 2);
    let (session, opened) =
        Session::open(&config, Box::new(Arc::clone(&store)), Box::new(clock.clone())).unwrap();

    assert_eq!(opened.origin, Origin::Restored);
    assert_eq!(
        opened.catch_up,
        CatchUp {
            elapsed_ticks: 5,
            applied_ticks: 5,
            capped: false,
        }
    );
    assert_eq!(session.snapshot(), expected.snapshot());
    assert_eq!(session.pet_state().last_update(), saved_at + 5 * INTERVAL);
    assert_eq!(session.pet_state().food(), 100 - 5 * 5);
}

#[test]
fn egg_hatches_and_waits_for_a_name() {
    let config = HatchlingConfig::default();
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(T0);
    let mut session = open(&config, &store, &clock);

    clock.advance(INTERVAL);
    session.tick().unwrap();
    clock.advance(INTERVAL);
    let outcome = session.tick().unwrap();
    assert!(matches!(
        outcome,
        Outcome::Applied(Effect::Ticked(effects)) if effects.transition.is_some()
    ));

    let pet = session.pet_state();
    assert_eq!(pet.life_stage(), LifeStage::Pup);
    assert_eq!(pet.age(), 0);
    assert!(pet.needs_advancement());
    assert_eq!(pet.hatched(), T0 + 2 * INTERVAL);

    // Frozen: ticks and actions do nothing.
    let frozen = session.snapshot();
    clock.advance(10 * INTERVAL);
    assert_eq!(
        session.tick().unwrap(),
        Outcome::Rejected(Rejection::AwaitingAdvancement)
    );
    assert_eq!(
        session.feed(10).unwrap(),
        Outcome::Rejected(Rejection::AwaitingAdvancement)
    );
    assert_eq!(session.snapshot(), frozen);

    assert_eq!(
        session.advance().unwrap(),
        Outcome::Rejected(Rejection::NameRequired)
    );
    assert_eq!(session.set_name("  ").unwrap(), Outcome::Rejected(Rejection::EmptyName));
    assert_eq!(session.set_name("Rex").unwrap(), Outcome::Applied(Effect::Named));
    assert!(session.advance().unwrap().is_applied());

    // Frozen time is not replayed: the next tick is one interval away.
    assert_eq!(session.pet_state().last_update(), clock_now(&clock));
    assert_eq!(session.catch_up(clock_now(&clock) + INTERVAL - 1).applied_ticks, 0);
}

#[test]
fn frozen_pet_survives_a_long_absence_unchanged() {
    let config = HatchlingConfig::default();
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(T0);
    let mut session = open(&config, &store, &clock);
    clock.advance(INTERVAL);
    session.tick().unwrap();
    clock.advance(INTERVAL);
    session.tick().unwrap();
    let frozen = session.snapshot();
    drop(session);

    clock.advance(365 * 24 * 60 * 60 * 1_000);
    let (session, opened) =
        Session::open(&config, Box::new(Arc::clone(&store)), Box::new(clock.clone())).unwrap();
    assert_eq!(opened.catch_up.applied_ticks, 0);
    assert!(opened.catch_up.elapsed_ticks > 0);
    assert_eq!(session.snapshot(), frozen);
}

#[test]
fn death_is_acknowledged_with_a_fresh_egg() {
    let mut config = HatchlingConfig::default();
    config.pet.egg_time = 1;
    config.pet.pup_time = 1;
    config.pet.adult_time = 1;
    config.pet.elder_time = 1;
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(T0);
    let mut session = named_pup(&config, &store, &clock);

    for stage in [LifeStage::Adult, LifeStage::Elder] {
        clock.advance(INTERVAL);
        session.tick().unwrap();
        assert_eq!(session.pet_state().life_stage(), stage);
        assert!(session.advance().unwrap().is_applied());
    }
    assert!(session.pet().unwrap().is_applied());

    clock.advance(INTERVAL);
    session.tick().unwrap();
    let pet = session.pet_state();
    assert_eq!(pet.life_stage(), LifeStage::Dead);
    assert!(!pet.is_alive());
    assert_eq!(session.pet().unwrap(), Outcome::Rejected(Rejection::Dead));

    clock.advance(INTERVAL);
    assert_eq!(
        session.advance().unwrap(),
        Outcome::Applied(Effect::Acknowledged(Acknowledgment::Replaced))
    );
    let pet = session.pet_state();
    assert_eq!(pet.life_stage(), LifeStage::Egg);
    assert!(pet.is_alive());
    assert_eq!(pet.name(), "");
    assert_eq!(pet.egg_found(), clock_now(&clock));

    // Fresh cooldowns: petting works again straight away.
    assert!(session.pet().unwrap().is_applied());

    let stored = store.load("pet").unwrap().unwrap();
    assert_eq!(stored.get("lifeStage").unwrap(), "egg");
}

#[test]
fn paused_time_is_not_replayed() {
    let config = HatchlingConfig::default();
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(T0);
    let mut session = named_pup(&config, &store, &clock);
    let before = session.snapshot();

    assert_eq!(
        session.toggle_pause().unwrap(),
        Outcome::Applied(Effect::PauseToggled { paused: true })
    );
    drop(session);

    clock.advance(50 * INTERVAL);
    let mut session = open(&config, &store, &clock);
    assert_eq!(session.snapshot().food, before.food);
    assert!(session.snapshot().paused);

    session.toggle_pause().unwrap();
    assert_eq!(session.pet_state().last_update(), clock_now(&clock));
    assert_eq!(session.catch_up(clock_now(&clock)), CatchUp::default());
}

#[test]
fn file_store_round_trip_and_corrupt_recovery() {
    let dir = std::env::temp_dir().join(format!("hatchling-it-{}", uuid::Uuid::new_v4()));
    let config = HatchlingConfig::default();
    let clock = ManualClock::new(T0);

    let (mut session, opened) = Session::open(
        &config,
        Box::new(JsonFileStore::open(&dir).unwrap()),
        Box::new(clock.clone()),
    )
    .unwrap();
    assert_eq!(opened.origin, Origin::Fresh);
    assert!(session.pet().unwrap().is_applied());
    let before = session.snapshot();
    drop(session);

    let (session, opened) = Session::open(
        &config,
        Box::new(JsonFileStore::open(&dir).unwrap()),
        Box::new(clock.clone()),
    )
    .unwrap();
    assert_eq!(opened.origin, Origin::Restored);
    assert_eq!(session.snapshot(), before);
    drop(session);

    std::fs::write(dir.join("pet.json"), "{ truncated").unwrap();
    let (session, opened) = Session::open(
        &config,
        Box::new(JsonFileStore::open(&dir).unwrap()),
        Box::new(clock.clone()),
    )
    .unwrap();
    assert_eq!(opened.origin, Origin::Recovered);
    assert_eq!(session.pet_state().life_stage(), LifeStage::Egg);

    std::fs::remove_dir_all(&dir).unwrap();
}

fn clock_now(clock: &ManualClock) -> i64 {
    use hatchling_core::Clock as _;
    clock.now_ms()
}
