//! Shared combat surface of mogwais and monsters

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Weapon;

/// The six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Abilities {
    pub fn new(scores: [i32; 6]) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores;
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Modifier for an ability score: 10-11 is +0, every two points more or
    /// less shift it by one
    pub fn modifier(score: i32) -> i32 {
        (score - 10).div_euclid(2)
    }

    pub fn strength_mod(&self) -> i32 {
        Self::modifier(self.strength)
    }

    pub fn dexterity_mod(&self) -> i32 {
        Self::modifier(self.dexterity)
    }

    pub fn constitution_mod(&self) -> i32 {
        Self::modifier(self.constitution)
    }
}

impl Default for Abilities {
    fn default() -> Self {
        Self::new([10; 6])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeType {
    Tiny,
    Small,
    Medium,
    Large,
}

impl SizeType {
    /// Armor class modifier for this size
    pub fn modifier(&self) -> i32 {
        match self {
            Self::Tiny => 2,
            Self::Small => 1,
            Self::Medium => 0,
            Self::Large => -1,
        }
    }
}

/// What a mogwai is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MogwaiState {
    Idle,
    Adventure,
    Unconscious,
}

/// Anything that can stand in an encounter
pub trait Entity {
    fn name(&self) -> &str;
    fn abilities(&self) -> &Abilities;
    fn size(&self) -> SizeType;
    fn natural_armor(&self) -> i32;
    fn base_attack_bonus(&self) -> i32;
    fn weapon(&self) -> &Weapon;
    fn current_hit_points(&self) -> i32;
    fn set_current_hit_points(&mut self, hit_points: i32);

    fn armor_class(&self) -> i32 {
        10 + self.abilities().dexterity_mod() + self.natural_armor() + self.size().modifier()
    }

    fn attack_bonus(&self) -> i32 {
        self.base_attack_bonus() + self.abilities().strength_mod()
    }

    fn initiative_modifier(&self) -> i32 {
        self.abilities().dexterity_mod()
    }

    fn damage_modifier(&self) -> i32 {
        self.abilities().strength_mod()
    }

    fn is_alive(&self) -> bool {
        self.current_hit_points() > 0
    }

    fn take_damage(&mut self, damage: i32) {
        let remaining = self.current_hit_points() - damage.max(0);
        self.set_current_hit_points(remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_modifiers_round_down() {
        assert_eq!(Abilities::modifier(10), 0);
        assert_eq!(Abilities::modifier(11), 0);
        assert_eq!(Abilities::modifier(12), 1);
        assert_eq!(Abilities::modifier(9), -1);
        assert_eq!(Abilities::modifier(2), -4);
        assert_eq!(Abilities::modifier(18), 4);
    }
}
