//! Natural and carried weapons

use serde::{Deserialize, Serialize};

use crate::domain::error::GameError;
use crate::domain::value_objects::Dice;

/// Damage profile of a weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage_count: u32,
    pub damage_sides: u32,
    /// Lowest natural attack roll that counts as a critical hit
    pub critical_min: u32,
    pub critical_multiplier: u32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage_count: u32, damage_sides: u32) -> Self {
        Self {
            name: name.into(),
            damage_count,
            damage_sides,
            critical_min: 20,
            critical_multiplier: 2,
        }
    }

    /// Unarmed strike
    pub fn fist() -> Self {
        Self::new("Fist", 1, 3)
    }

    pub fn bite() -> Self {
        Self::new("Bite", 1, 3)
    }

    /// Damage for one hit; every hit deals at least one point
    pub fn roll_damage(&self, dice: &mut Dice, modifier: i32, critical: bool) -> Result<i32, GameError> {
        let multiplier = if critical { self.critical_multiplier } else { 1 };
        let damage = dice.roll_with(self.damage_count * multiplier, self.damage_sides, modifier * multiplier as i32)?;
        Ok(damage.max(1))
    }
}
