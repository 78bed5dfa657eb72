//! Domain layer - Deterministic game rules with no I/O
//!
//! This layer contains:
//! - Entities: Shift, Mogwai, Monster, Adventure, Dungeon
//! - Value Objects: Dice, HexValue, BlockHashCache, GameRules
//! - Domain Events: Progression and adventure notifications
//! - Domain Services: Shift reconstruction, combat, adventure generation

pub mod entities;
pub mod error;
pub mod events;
pub mod services;
pub mod value_objects;
