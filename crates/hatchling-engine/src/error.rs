//! Error types for the Hatchling host binary.
//!
//! [`EngineError`] wraps every failure mode during startup and while the
//! heartbeat runs, so `main` can propagate with `?`.

/// Top-level error for the host binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hatchling_core::ConfigError,
    },

    /// The state directory could not be opened.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: hatchling_store::StoreError,
    },

    /// Loading or saving the pet failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: hatchling_core::SessionError,
    },

    /// The scheduler could not start or stopped on an error.
    #[error("scheduler error: {source}")]
    Scheduler {
        /// The underlying scheduler error.
        #[from]
        source: hatchling_core::SchedulerError,
    },

    /// Reading the console failed.
    #[error("console I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
