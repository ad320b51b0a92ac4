//! Error types for the storage layer.
//!
//! All errors are propagated via [`StoreError`], which wraps the underlying
//! I/O and JSON errors with the slot key they concern.

/// Errors that can occur while reading or writing a snapshot slot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on slot `{key}`: {source}")]
    Io {
        /// The slot key.
        key: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The slot holds bytes that are not valid JSON, or the value could not
    /// be encoded.
    #[error("Serialization error on slot `{key}`: {source}")]
    Serialization {
        /// The slot key.
        key: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The key cannot name a slot (empty, or contains a path separator).
    #[error("Invalid slot key: {0:?}")]
    InvalidKey(String),

    /// A writer panicked while holding the in-memory store lock.
    #[error("Snapshot store lock poisoned")]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
