//! The snapshot storage seam.

use serde_json::Value;

use crate::error::StoreError;

/// A keyed slot store holding one JSON value per key.
///
/// Implementations are synchronous: a save has completed (or failed) by the
/// time it returns.
pub trait SnapshotStore: Send {
    /// Read the value stored at `key`. `Ok(None)` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot cannot be read or does not hold
    /// valid JSON.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the slot cannot be written.
    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

impl<S: SnapshotStore + Sync + ?Sized> SnapshotStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}
