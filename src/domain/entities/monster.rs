//! Monsters met in encounters

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Abilities, Entity, SizeType};
use crate::domain::value_objects::Weapon;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub challenge_rating: f64,
    pub abilities: Abilities,
    pub size: SizeType,
    pub natural_armor: i32,
    pub base_attack_bonus: i32,
    pub hit_points: i32,
    pub weapon: Weapon,
}

impl Monster {
    /// Dire rat: tiny, quick and weak
    pub fn rat() -> Self {
        Self {
            name: "Rat".to_string(),
            challenge_rating: 0.25,
            abilities: Abilities::new([2, 15, 11, 2, 12, 2]),
            size: SizeType::Tiny,
            natural_armor: 0,
            base_attack_bonus: 0,
            hit_points: 2,
            weapon: Weapon::bite(),
        }
    }
}

impl Entity for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    fn size(&self) -> SizeType {
        self.size
    }

    fn natural_armor(&self) -> i32 {
        self.natural_armor
    }

    fn base_attack_bonus(&self) -> i32 {
        self.base_attack_bonus
    }

    fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    fn current_hit_points(&self) -> i32 {
        self.hit_points
    }

    fn set_current_hit_points(&mut self, hit_points: i32) {
        self.hit_points = hit_points;
    }

    // Monsters attack with finesse
    fn attack_bonus(&self) -> i32 {
        self.base_attack_bonus + self.abilities.dexterity_mod() + self.size.modifier()
    }
}
