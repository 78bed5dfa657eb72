//! Mogwai entity - the player character bound to one address
//!
//! A mogwai is rebuilt from its shift history every session. Its birth traits
//! come from the creation shift (the first shift of the history) and never
//! change. Everything else moves forward through [`Mogwai::evolve`], which
//! replays shifts above the pointer in height order.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde::Serialize;
use tracing::debug;

use crate::domain::entities::appearance::{generate_name, TRAIT_KEY};
use crate::domain::entities::{
    Abilities, Body, Coat, Entity, Experience, MogwaiState, Shift, ShiftHistory, SizeType, Stats,
};
use crate::domain::error::GameError;
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::value_objects::{GameRules, RollEvent, Weapon};

/// Outcome of one [`Mogwai::evolve`] call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolveReport {
    /// Pointer before the call
    pub from: u64,
    /// Pointer after the call
    pub to: u64,
    pub events: Vec<DomainEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mogwai {
    key: String,
    name: String,
    birth_height: u64,
    pointer: u64,
    current_level: u32,
    exp: f64,
    shifts: ShiftHistory,
    level_shifts: BTreeMap<u32, Shift>,
    state: MogwaiState,

    // Birth traits
    gender: i32,
    abilities: Abilities,
    body: Body,
    coat: Coat,
    stats: Stats,
    experience: Experience,

    // Combat
    hit_point_dice: u32,
    hit_point_level_rolls: Vec<u32>,
    current_hit_points: i32,
    base_attack_bonus: i32,
    natural_armor: i32,
    size: SizeType,
    weapon: Weapon,

    rules: GameRules,
}

impl Mogwai {
    /// Hydrate a mogwai from its shift history. The first shift is the
    /// creation shift and is considered applied.
    pub fn new(key: impl Into<String>, shifts: ShiftHistory, rules: GameRules) -> Result<Self, GameError> {
        let creation = shifts
            .values()
            .next()
            .cloned()
            .ok_or(GameError::EmptyShiftHistory)?;

        let mut dice = creation.dice()?;
        let gender = dice.roll_with(1, 2, -1)?;
        let mut scores = [0; 6];
        for score in scores.iter_mut() {
            *score = dice.roll_event(&RollEvent::ABILITY_SCORE)?;
        }

        let traits = creation.hex_value(TRAIT_KEY);
        let experience = Experience::new(&creation, &rules);

        let mut level_shifts = BTreeMap::new();
        level_shifts.insert(1, creation.clone());

        let mut mogwai = Self {
            key: key.into(),
            name: generate_name(&traits),
            birth_height: creation.height,
            pointer: creation.height,
            current_level: 1,
            exp: 0.0,
            shifts,
            level_shifts,
            state: MogwaiState::Idle,
            gender,
            abilities: Abilities::new(scores),
            body: Body::new(&traits),
            coat: Coat::new(&traits),
            stats: Stats::new(&traits),
            experience,
            hit_point_dice: rules.hit_point_die,
            hit_point_level_rolls: Vec::new(),
            current_hit_points: 0,
            base_attack_bonus: 1,
            natural_armor: 0,
            size: SizeType::Medium,
            weapon: Weapon::fist(),
            rules,
        };
        mogwai.current_hit_points = mogwai.max_hit_points();

        debug!(
            key = %mogwai.key,
            name = %mogwai.name,
            birth_height = mogwai.birth_height,
            "Mogwai hydrated"
        );
        Ok(mogwai)
    }

    // Getters

    pub fn birth_height(&self) -> u64 {
        self.birth_height
    }

    /// Highest height already applied
    pub fn pointer(&self) -> u64 {
        self.pointer
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn exp(&self) -> f64 {
        self.exp
    }

    pub fn shifts(&self) -> &ShiftHistory {
        &self.shifts
    }

    /// The shift at the pointer
    pub fn current_shift(&self) -> Option<&Shift> {
        self.shifts.get(&self.pointer)
    }

    pub fn level_shifts(&self) -> &BTreeMap<u32, Shift> {
        &self.level_shifts
    }

    pub fn state(&self) -> MogwaiState {
        self.state
    }

    pub fn gender(&self) -> i32 {
        self.gender
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn coat(&self) -> &Coat {
        &self.coat
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn experience(&self) -> &Experience {
        &self.experience
    }

    pub fn hit_point_dice(&self) -> u32 {
        self.hit_point_dice
    }

    pub fn hit_point_level_rolls(&self) -> &[u32] {
        &self.hit_point_level_rolls
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn max_hit_points(&self) -> i32 {
        let rolled: u32 = self.hit_point_level_rolls.iter().sum();
        let hit_points = self.hit_point_dice as i32
            + rolled as i32
            + self.abilities.constitution_mod() * self.current_level as i32;
        hit_points.max(1)
    }

    pub(crate) fn set_state(&mut self, state: MogwaiState) {
        self.state = state;
    }

    /// Replay every shift above the pointer up to `target` (inclusive). A
    /// target of zero replays the whole history.
    ///
    /// On error the mogwai stays at the last shift that applied cleanly, so a
    /// later call resumes from there.
    pub fn evolve(&mut self, target: u64) -> Result<EvolveReport, GameError> {
        let from = self.pointer;
        if target != 0 && target <= self.pointer {
            return Ok(EvolveReport {
                from,
                to: from,
                events: Vec::new(),
            });
        }

        let upper = if target == 0 {
            Bound::Unbounded
        } else {
            Bound::Included(target)
        };
        let pending: Vec<Shift> = self
            .shifts
            .range((Bound::Excluded(self.pointer), upper))
            .map(|(_, shift)| shift.clone())
            .collect();

        let mut events = Vec::new();
        for shift in &pending {
            self.apply_shift(shift, &mut events)?;
        }

        debug!(
            key = %self.key,
            from,
            to = self.pointer,
            level = self.current_level,
            exp = self.exp,
            "Mogwai evolved"
        );
        Ok(EvolveReport {
            from,
            to: self.pointer,
            events,
        })
    }

    fn apply_shift(&mut self, shift: &Shift, events: &mut Vec<DomainEvent>) -> Result<(), GameError> {
        let exp = self.experience.get_exp(self.current_level, shift, &self.rules);
        if exp > 0.0 {
            events.extend(self.add_exp(exp, shift)?);
        }

        if self.state == MogwaiState::Idle {
            let factor = if shift.is_small_shift {
                self.rules.small_shift_regeneration
            } else {
                1
            };
            let healed = self.heal(factor * self.current_level as i32);
            if healed > 0 {
                events.push(DomainEvent::Regenerated {
                    metadata: EventMetadata::from(shift),
                    amount: healed,
                    hit_points: self.current_hit_points,
                });
            }
        }

        self.pointer = shift.height;
        Ok(())
    }

    /// Add experience gained at `shift`, leveling up once per threshold
    /// crossed. Every level up rolls a hit point die from the shift and heals
    /// to full.
    ///
    /// All rolls happen before anything changes, so an exhausted draw source
    /// leaves the mogwai untouched.
    pub fn add_exp(&mut self, exp: f64, shift: &Shift) -> Result<Vec<DomainEvent>, GameError> {
        let exp = if exp.is_finite() { exp.max(0.0) } else { 0.0 };
        let total = self.exp + exp;

        let level = self.rules.level_for_exp(total).max(self.current_level);

        let mut rolls = Vec::new();
        if level > self.current_level {
            let mut dice = shift.dice()?;
            for _ in self.current_level..level {
                rolls.push(dice.roll(self.hit_point_dice)?);
            }
        }

        let metadata = EventMetadata::from(shift);
        self.exp = total;
        let mut events = vec![DomainEvent::ExperienceGained {
            metadata,
            amount: exp,
            total,
        }];

        let leveled = !rolls.is_empty();
        for roll in rolls {
            self.current_level += 1;
            self.level_shifts.insert(self.current_level, shift.clone());
            self.hit_point_level_rolls.push(roll);
            debug!(key = %self.key, level = self.current_level, hit_point_roll = roll, "Level up");
            events.push(DomainEvent::LevelReached {
                metadata,
                level: self.current_level,
                hit_point_roll: roll,
            });
        }

        if leveled {
            self.current_hit_points = self.max_hit_points();
            if self.state == MogwaiState::Unconscious {
                self.state = MogwaiState::Idle;
            }
        }
        Ok(events)
    }

    /// Heal up to max hit points, returning the amount healed
    fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_hit_points;
        self.current_hit_points = (before + amount.max(0)).min(self.max_hit_points()).max(before);
        self.current_hit_points - before
    }
}

impl Entity for Mogwai {
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
        self.current_hit_points
    }

    fn set_current_hit_points(&mut self, hit_points: i32) {
        self.current_hit_points = hit_points;
    }
}
