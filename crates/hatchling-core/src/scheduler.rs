//! The heartbeat loop.
//!
//! [`Scheduler::run`] owns the [`Session`] and multiplexes two inputs with
//! `tokio::select!`:
//!
//! - **Heartbeat**: one tick every `tick_interval_ms`
//! - **Commands**: owner requests from any [`SchedulerHandle`]
//!
//! Each input is applied to completion before the next is taken, so the
//! pet is never touched concurrently. After every applied heartbeat and
//! every command, the [`SnapshotObserver`] sees the new snapshot.

use std::time::Duration;

use hatchling_types::PetSnapshot;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use crate::control::{Command, Request, SchedulerError, SchedulerHandle, Update};
use crate::session::{CatchUp, Outcome, Session, SessionError};

/// Depth of the command channel.
const COMMAND_BUFFER: usize = 32;

/// Receives the pet after every change.
///
/// Implementations render, broadcast, or record snapshots.
pub trait SnapshotObserver: Send {
    /// Called after every command and every applied heartbeat tick.
    fn on_update(&mut self, update: &Update);

    /// Called once with the result of the startup catch-up.
    fn on_catch_up(&mut self, _catch_up: &CatchUp, _snapshot: &PetSnapshot) {}
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl SnapshotObserver for NoOpObserver {
    fn on_update(&mut self, _update: &Update) {}
}

/// Why and how the scheduler stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Heartbeat ticks that were applied.
    pub heartbeat_ticks: u64,
    /// Commands handled.
    pub commands: u64,
}

/// Drives a [`Session`] on a fixed heartbeat.
pub struct Scheduler {
    session: Session,
    period: Duration,
    rx: mpsc::Receiver<Command>,
    observer: Box<dyn SnapshotObserver>,
}

impl Scheduler {
    /// Build a scheduler around `session`, returning it with a handle.
    ///
    /// The heartbeat period comes from the session's schedule.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroInterval`] if `tick_interval_ms` is 0.
    pub fn new(
        session: Session,
        observer: Box<dyn SnapshotObserver>,
    ) -> Result<(Self, SchedulerHandle), SchedulerError> {
        let interval_ms = session.schedule().tick_interval_ms;
        if interval_ms == 0 {
            return Err(SchedulerError::ZeroInterval);
        }
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let scheduler = Self {
            session,
            period: Duration::from_millis(interval_ms),
            rx,
            observer,
        };
        Ok((scheduler, SchedulerHandle::new(tx)))
    }

    /// Run until shutdown is requested or every handle is dropped.
    ///
    /// The first heartbeat fires one period after start. Returns the session
    /// so the caller can inspect or save it.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Session`] if a heartbeat tick cannot be
    /// saved. Command failures are reported to the caller of that command.
    pub async fn run(mut self) -> Result<(RunSummary, Session), SchedulerError> {
        let mut heartbeat = time::interval(self.period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        heartbeat.tick().await;
        let mut summary = RunSummary {
            heartbeat_ticks: 0,
            commands: 0,
        };

        info!(
            tick_interval_ms = self.session.schedule().tick_interval_ms,
            "Scheduler starting"
        );

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    let update = self.apply(Request::Tick)?;
                    if update.outcome.is_applied() {
                        summary.heartbeat_ticks = summary.heartbeat_ticks.saturating_add(1);
                        self.observer.on_update(&update);
                    }
                }
                command = self.rx.recv() => {
                    match command {
                        Some(Command::Apply { request, reply }) => {
                            summary.commands = summary.commands.saturating_add(1);
                            let result = self.apply(request);
                            if let Ok(update) = &result {
                                self.observer.on_update(update);
                            }
                            if reply.send(result).is_err() {
                                tracing::debug!("Command caller went away before the reply");
                            }
                        }
                        Some(Command::Snapshot { reply }) => {
                            if reply.send(self.session.snapshot()).is_err() {
                                tracing::debug!("Snapshot caller went away before the reply");
                            }
                        }
                        Some(Command::Shutdown) | None => break,
                    }
                }
            }
        }

        info!(
            heartbeat_ticks = summary.heartbeat_ticks,
            commands = summary.commands,
            "Scheduler stopped"
        );
        Ok((summary, self.session))
    }

    fn apply(&mut self, request: Request) -> Result<Update, SessionError> {
        let outcome = dispatch(&mut self.session, &request)?;
        Ok(Update {
            request,
            outcome,
            snapshot: self.session.snapshot(),
        })
    }
}

/// Route a request to the matching session operation.
pub fn dispatch(session: &mut Session, request: &Request) -> Result<Outcome, SessionError> {
    match request {
        Request::Tick => session.tick(),
        Request::Feed { amount } => session.feed(*amount),
        Request::Pet => session.pet(),
        Request::Clean => session.clean(),
        Request::Advance => session.advance(),
        Request::SetName(name) => session.set_name(name),
        Request::NameAndAdvance(name) => session.name_and_advance(name),
        Request::TogglePause => session.toggle_pause(),
        Request::Reset => session.reset(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use std::sync::{Arc, Mutex};

    use hatchling_pet::Rejection;
    use hatchling_store::MemoryStore;

    use super::*;
    use crate::clock::ManualClock;
    use crate::config::HatchlingConfig;
    use crate::session::Effect;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Update>>>);

    impl SnapshotObserver for Recorder {
        fn on_update(&mut self, update: &Update) {
            self.0.lock().unwrap().push(update.clone());
        }
    }

    fn session(config: &HatchlingConfig) -> Session {
        let (session, _) = Session::open(
            config,
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::new(1_000)),
        )
        .unwrap();
        session
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = HatchlingConfig::default();
        config.schedule.tick_interval_ms = 0;
        let result = Scheduler::new(session(&config), Box::new(NoOpObserver));
        assert!(matches!(result, Err(SchedulerError::ZeroInterval)));
    }

    #[tokio::test]
    async fn commands_are_applied_and_observed() {
        let recorder = Recorder::default();
        let config = HatchlingConfig::default();
        let (scheduler, handle) =
            Scheduler::new(session(&config), Box::new(recorder.clone())).unwrap();
        let task = tokio::spawn(scheduler.run());

        let update = handle.pet().await.unwrap();
        assert_eq!(update.outcome, Outcome::Applied(Effect::Petted));
        assert_eq!(update.snapshot.behavior, 1);

        let update = handle.pet().await.unwrap();
        assert!(matches!(
            update.outcome,
            Outcome::Rejected(Rejection::CoolingDown { .. })
        ));

        let update = handle.force_tick().await.unwrap();
        assert_eq!(update.request, Request::Tick);
        assert_eq!(update.snapshot.age, 1);

        handle.shutdown().await;
        let (summary, session) = task.await.unwrap().unwrap();
        assert_eq!(summary.commands, 3);
        assert_eq!(session.pet_state().age(), 1);
        assert_eq!(recorder.0.lock().unwrap().len(), 3);
        assert!(matches!(handle.pet().await, Err(SchedulerError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_ticks_on_schedule() {
        let recorder = Recorder::default();
        let config = HatchlingConfig::default();
        let (scheduler, handle) =
            Scheduler::new(session(&config), Box::new(recorder.clone())).unwrap();
        let task = tokio::spawn(scheduler.run());

        time::sleep(Duration::from_millis(30_000 * 3 + 10)).await;
        let snapshot = handle.snapshot().await.unwrap();
        handle.shutdown().await;
        let (summary, _) = task.await.unwrap().unwrap();

        // The egg hatches on the second heartbeat and freezes; the third is skipped.
        assert_eq!(summary.heartbeat_ticks, 2);
        assert!(snapshot.awaiting_name);
        assert_eq!(recorder.0.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn dropping_every_handle_stops_the_loop() {
        let config = HatchlingConfig::default();
        let (scheduler, handle) = Scheduler::new(session(&config), Box::new(NoOpObserver)).unwrap();
        drop(handle);
        let (summary, _) = scheduler.run().await.unwrap();
        assert_eq!(summary.commands, 0);
    }
}
