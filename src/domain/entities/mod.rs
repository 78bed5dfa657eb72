//! Domain entities - Core game objects with identity or lifecycle

mod adventure;
pub(crate) mod appearance;
mod dungeon;
mod entity;
mod experience;
mod mogwai;
mod monster;
mod shift;

pub use adventure::{Adventure, AdventureAction, AdventureKind, AdventureState, AdventureType, DifficultyType};
pub use appearance::{Attribute, Body, Coat, Stats};
pub use dungeon::Dungeon;
pub use entity::{Abilities, Entity, MogwaiState, SizeType};
pub use experience::Experience;
pub use mogwai::{EvolveReport, Mogwai};
pub use monster::Monster;
pub use shift::{LocatedBurn, Shift, ShiftHistory};
