//! Owner control surface for a running scheduler.
//!
//! A [`SchedulerHandle`] is a cheap, cloneable sender. Each call becomes a
//! [`Command`] on the scheduler's channel and is applied to the session
//! between heartbeats, so owner actions never race with ticks.

use hatchling_types::PetSnapshot;
use tokio::sync::{mpsc, oneshot};

use crate::session::{Outcome, SessionError};

/// Errors returned by a [`SchedulerHandle`] or the scheduler loop.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Persisting the pet failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: SessionError,
    },

    /// The scheduler has stopped and no longer accepts commands.
    #[error("scheduler is not running")]
    Closed,

    /// `tick_interval_ms` was zero.
    #[error("tick interval must be at least 1 ms")]
    ZeroInterval,
}

/// An operation on the live pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// One tick now, outside the heartbeat.
    Tick,
    /// Give `amount` food.
    Feed {
        /// Food to add.
        amount: i32,
    },
    /// Pet the pet.
    Pet,
    /// Clean up.
    Clean,
    /// Acknowledge the pending stage boundary.
    Advance,
    /// Name the pet at the naming step.
    SetName(String),
    /// Name the pet and acknowledge the naming step.
    NameAndAdvance(String),
    /// Flip the pause flag.
    TogglePause,
    /// Start over with a fresh egg.
    Reset,
}

impl core::fmt::Display for Request {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Tick => write!(f, "tick"),
            Self::Feed { amount } => write!(f, "feed {amount}"),
            Self::Pet => write!(f, "pet"),
            Self::Clean => write!(f, "clean"),
            Self::Advance => write!(f, "advance"),
            Self::SetName(name) => write!(f, "name {name}"),
            Self::NameAndAdvance(name) => write!(f, "name and advance {name}"),
            Self::TogglePause => write!(f, "pause"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

/// The result of one request, with the pet as it stands afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// What was asked for. Heartbeat ticks carry [`Request::Tick`].
    pub request: Request,
    /// What happened.
    pub outcome: Outcome,
    /// The pet after the request.
    pub snapshot: PetSnapshot,
}

/// Messages consumed by the scheduler loop.
#[derive(Debug)]
pub(crate) enum Command {
    /// Apply a request and reply with the update.
    Apply {
        request: Request,
        reply: oneshot::Sender<Result<Update, SessionError>>,
    },
    /// Reply with the current snapshot.
    Snapshot { reply: oneshot::Sender<PetSnapshot> },
    /// Stop the loop after the current command.
    Shutdown,
}

/// Cloneable handle for driving a running scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<Command>,
}

impl SchedulerHandle {
    pub(crate) const fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    /// Feed `amount` food.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn feed(&self, amount: i32) -> Result<Update, SchedulerError> {
        self.apply(Request::Feed { amount }).await
    }

    /// Pet the pet.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn pet(&self) -> Result<Update, SchedulerError> {
        self.apply(Request::Pet).await
    }

    /// Clean up.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn clean(&self) -> Result<Update, SchedulerError> {
        self.apply(Request::Clean).await
    }

    /// Acknowledge the pending stage boundary.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn advance(&self) -> Result<Update, SchedulerError> {
        self.apply(Request::Advance).await
    }

    /// Name the pet at the naming step.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn set_name(&self, name: impl Into<String>) -> Result<Update, SchedulerError> {
        self.apply(Request::SetName(name.into())).await
    }

    /// Name the pet and acknowledge the naming step.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn name_and_advance(
        &self,
        name: impl Into<String>,
    ) -> Result<Update, SchedulerError> {
        self.apply(Request::NameAndAdvance(name.into())).await
    }

    /// Flip the pause flag.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn toggle_pause(&self) -> Result<Update, SchedulerError> {
        self.apply(Request::TogglePause).await
    }

    /// Start over with a fresh egg.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn reset(&self) -> Result<Update, SchedulerError> {
        self.apply(Request::Reset).await
    }

    /// Run one tick immediately.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn force_tick(&self) -> Result<Update, SchedulerError> {
        self.apply(Request::Tick).await
    }

    /// The pet as it stands now.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Closed`] if the scheduler stopped.
    pub async fn snapshot(&self) -> Result<PetSnapshot, SchedulerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_closed| SchedulerError::Closed)
    }

    /// Ask the scheduler to stop. Succeeds if it already stopped.
    pub async fn shutdown(&self) {
        if self.tx.send(Command::Shutdown).await.is_err() {
            tracing::debug!("Scheduler already stopped");
        }
    }

    /// Apply any request and wait for its update.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError`] if the scheduler stopped or the save failed.
    pub async fn apply(&self, request: Request) -> Result<Update, SchedulerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Apply { request, reply }).await?;
        let update = rx.await.map_err(|_closed| SchedulerError::Closed)??;
        Ok(update)
    }

    async fn send(&self, command: Command) -> Result<(), SchedulerError> {
        self.tx
            .send(command)
            .await
            .map_err(|_closed| SchedulerError::Closed)
    }
}
