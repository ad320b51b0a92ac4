//! Shared type definitions for the Hatchling pet simulation.
//!
//! This crate holds plain data shared between the simulation logic, the
//! orchestration layer, and renderers. Types used by a renderer flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`enums`] -- Life stages, creature types, cooldown-guarded actions
//! - [`snapshot`] -- The read-only [`PetSnapshot`] handed to renderers

pub mod enums;
pub mod snapshot;

pub use enums::{LifeStage, PetAction, PetType};
pub use snapshot::PetSnapshot;

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::enums::LifeStage::export_all();
        let _ = crate::enums::PetType::export_all();
        let _ = crate::enums::PetAction::export_all();
        let _ = crate::snapshot::PetSnapshot::export_all();
    }
}
