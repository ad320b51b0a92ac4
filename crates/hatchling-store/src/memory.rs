//! In-memory snapshot slots.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::error::StoreError;
use crate::store::SnapshotStore;

/// Snapshot slots held in a map, for tests and ephemeral sessions.
///
/// Wrap it in an `Arc` to keep a handle for inspecting what a session saved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<BTreeMap<String, Value>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with `value` already saved at `key`.
    pub fn with_slot(key: &str, value: Value) -> Self {
        let mut slots = BTreeMap::new();
        slots.insert(key.to_owned(), value);
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Number of occupied slots.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.slots.lock()?.len())
    }

    /// Whether no slot is occupied.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let slots = self.slots.lock()?;
        Ok(slots.get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut slots = self.slots.lock()?;
        slots.insert(key.to_owned(), value.clone());
        Ok(())
    }
}
