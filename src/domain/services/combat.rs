//! Combat resolver - turn based encounters between a mogwai and monsters
//!
//! Every combatant draws from its own digest of the encounter shift, keyed
//! by the encounter's stage, so the whole fight is fixed by the shift, the
//! stage and the roster. Turn order is rolled
//! once; each living combatant then attacks the first living enemy until one
//! side is down or the round limit is hit.

use serde::Serialize;
use tracing::debug;

use crate::domain::entities::{Entity, Mogwai, MogwaiState, Monster, Shift};
use crate::domain::error::GameError;
use crate::domain::value_objects::Dice;

/// Digests chained per combatant
const DICE_BLOCKS: usize = 4;

/// Hero is always combatant zero, monsters follow in roster order
const HERO: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatOutcome {
    pub hero_won: bool,
    pub rounds: u32,
}

/// One participant for the length of one encounter
#[derive(Debug)]
struct Combatant {
    index: usize,
    initiative: i32,
    initiative_modifier: i32,
    dice: Dice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attack {
    roll: u32,
    hit: bool,
    critical: bool,
    damage: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleCombat {
    monsters: Vec<Monster>,
    /// Separates the dice of encounters fought on the same shift
    stage: usize,
}

impl SimpleCombat {
    pub fn new(monsters: Vec<Monster>) -> Self {
        Self::staged(monsters, 0)
    }

    pub fn staged(monsters: Vec<Monster>, stage: usize) -> Self {
        Self { monsters, stage }
    }

    #[cfg(test)]
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    fn monsters_alive(&self) -> bool {
        self.monsters.iter().any(|m| m.is_alive())
    }

    fn is_alive(&self, hero: &Mogwai, index: usize) -> bool {
        match index {
            HERO => hero.is_alive(),
            i => self.monsters[i - 1].is_alive(),
        }
    }

    /// Fight the encounter to the end. A hero dropping to zero hit points
    /// falls unconscious.
    pub fn run(&mut self, hero: &mut Mogwai, shift: &Shift, max_rounds: u32) -> Result<CombatOutcome, GameError> {
        let mut combatants = self.roll_initiative(hero, shift)?;

        for round in 1..=max_rounds {
            for combatant in combatants.iter_mut() {
                if !self.is_alive(hero, combatant.index) {
                    continue;
                }

                if combatant.index == HERO {
                    if let Some(target) = self.monsters.iter_mut().find(|m| m.is_alive()) {
                        let attack = resolve_attack(&*hero, &mut *target, &mut combatant.dice)?;
                        debug!(round, attacker = hero.name(), defender = target.name(), ?attack, "Attack");
                    }
                } else {
                    let monster = &self.monsters[combatant.index - 1];
                    let attack = resolve_attack(monster, &mut *hero, &mut combatant.dice)?;
                    debug!(round, attacker = monster.name(), defender = hero.name(), ?attack, "Attack");
                }

                if !hero.is_alive() {
                    hero.set_state(MogwaiState::Unconscious);
                    return Ok(CombatOutcome {
                        hero_won: false,
                        rounds: round,
                    });
                }
                if !self.monsters_alive() {
                    return Ok(CombatOutcome {
                        hero_won: true,
                        rounds: round,
                    });
                }
            }
        }

        debug!(max_rounds, "Combat ran out of rounds");
        Ok(CombatOutcome {
            hero_won: false,
            rounds: max_rounds,
        })
    }

    /// Roll initiative for everyone, highest first. Ties go to the better
    /// modifier, then to roster order.
    fn roll_initiative(&self, hero: &Mogwai, shift: &Shift) -> Result<Vec<Combatant>, GameError> {
        let modifiers = std::iter::once(hero.initiative_modifier())
            .chain(self.monsters.iter().map(|m| m.initiative_modifier()));

        let mut combatants = Vec::with_capacity(self.monsters.len() + 1);
        for (index, initiative_modifier) in modifiers.enumerate() {
            let mut dice = combatant_dice(shift, self.stage, index)?;
            let initiative = dice.roll(20)? as i32 + initiative_modifier;
            combatants.push(Combatant {
                index,
                initiative,
                initiative_modifier,
                dice,
            });
        }

        combatants.sort_by(|a, b| {
            b.initiative
                .cmp(&a.initiative)
                .then(b.initiative_modifier.cmp(&a.initiative_modifier))
                .then(a.index.cmp(&b.index))
        });
        Ok(combatants)
    }
}

fn combatant_dice(shift: &Shift, stage: usize, index: usize) -> Result<Dice, GameError> {
    let hex: String = (0..DICE_BLOCKS)
        .map(|block| {
            shift
                .hex_value(&format!("combatant:{stage}:{index}:{block}"))
                .as_str()
                .to_string()
        })
        .collect();
    Dice::new(&hex)
}

/// A natural 20 always hits, a natural 1 always misses
fn resolve_attack<A, D>(attacker: &A, defender: &mut D, dice: &mut Dice) -> Result<Attack, GameError>
where
    A: Entity + ?Sized,
    D: Entity + ?Sized,
{
    let roll = dice.roll(20)?;
    let weapon = attacker.weapon();
    let critical = roll >= weapon.critical_min;
    let hit = roll == 20 || (roll != 1 && roll as i32 + attacker.attack_bonus() >= defender.armor_class());

    let damage = if hit {
        weapon.roll_damage(dice, attacker.damage_modifier(), critical)?
    } else {
        0
    };
    defender.take_damage(damage);

    Ok(Attack {
        roll,
        hit,
        critical: hit && critical,
        damage,
    })
}
