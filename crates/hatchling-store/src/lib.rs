//! Keyed snapshot storage for the Hatchling simulation.
//!
//! A pet is persisted as one JSON value under one slot key. This crate
//! knows nothing about pets; it stores and returns [`serde_json::Value`]s.
//!
//! # Modules
//!
//! - [`error`] -- Error types for storage operations ([`StoreError`])
//! - [`file`] -- One JSON file per slot with atomic replace ([`JsonFileStore`])
//! - [`memory`] -- In-memory slots for tests ([`MemoryStore`])
//! - [`store`] -- The [`SnapshotStore`] trait

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::SnapshotStore;
