//! Domain services - Pure game rules spanning several entities

pub mod adventure_generator;
mod combat;
pub mod shift_reconstructor;

pub use combat::{CombatOutcome, SimpleCombat};
