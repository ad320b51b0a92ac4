//! Session, persistence catch-up, wall clock, and tick scheduler for the
//! Hatchling simulation.
//!
//! This crate wires the pure pet logic from `hatchling-pet` to time and
//! storage. A [`Session`] owns the pet and saves it after every change; a
//! [`Scheduler`] drives the session on a heartbeat and serializes owner
//! commands arriving through a [`SchedulerHandle`].
//!
//! # Modules
//!
//! - [`clock`] -- Wall-clock source ([`SystemClock`]) and a test clock ([`ManualClock`])
//! - [`config`] -- `hatchling.yaml` loading into typed structs ([`HatchlingConfig`])
//! - [`control`] -- Owner requests and the [`SchedulerHandle`]
//! - [`scheduler`] -- The heartbeat loop and [`SnapshotObserver`] render hook
//! - [`session`] -- Load, catch-up, owner operations, and save ([`Session`])
//!
//! [`SystemClock`]: clock::SystemClock
//! [`ManualClock`]: clock::ManualClock

pub mod clock;
pub mod config;
pub mod control;
pub mod scheduler;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, HatchlingConfig};
pub use control::{Request, SchedulerError, SchedulerHandle, Update};
pub use scheduler::{NoOpObserver, RunSummary, Scheduler, SnapshotObserver};
pub use session::{CatchUp, Effect, Opened, Origin, Outcome, Session, SessionError};
