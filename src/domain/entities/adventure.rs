//! Adventure entity - a gameplay interaction advanced one shift at a time

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::entities::{Dungeon, Mogwai, MogwaiState, Shift};
use crate::domain::error::GameError;
use crate::domain::events::{DomainEvent, EventMetadata};
use crate::domain::services::{CombatOutcome, SimpleCombat};
use crate::domain::value_objects::AdventureId;

/// Largest value a packed field can hold after its enum tag
const PACKED_FIELD_MAX: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdventureType {
    TestRoom = 0,
    Dungeon = 1,
    Battle = 2,
    Quest = 3,
}

impl TryFrom<u32> for AdventureType {
    type Error = GameError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::TestRoom),
            1 => Ok(Self::Dungeon),
            2 => Ok(Self::Battle),
            3 => Ok(Self::Quest),
            other => Err(GameError::InvalidPackedValue(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyType {
    Trivial = 0,
    Easy = 1,
    Average = 2,
    Challenging = 3,
    Hard = 4,
    Deadly = 5,
}

impl TryFrom<u32> for DifficultyType {
    type Error = GameError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Trivial),
            1 => Ok(Self::Easy),
            2 => Ok(Self::Average),
            3 => Ok(Self::Challenging),
            4 => Ok(Self::Hard),
            5 => Ok(Self::Deadly),
            other => Err(GameError::InvalidPackedValue(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdventureState {
    Creation,
    Running,
    Failed,
    Completed,
}

impl AdventureState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Completed)
    }
}

/// The parameters of an adventure, as burned on chain.
///
/// Packs into two four digit decimals: the leading digit is the enum tag and
/// the remaining three hold the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdventureAction {
    pub adventure_type: AdventureType,
    pub difficulty: DifficultyType,
    pub challenge_rating: u32,
    pub average_party_level: u32,
}

impl AdventureAction {
    pub fn new(
        adventure_type: AdventureType,
        difficulty: DifficultyType,
        average_party_level: u32,
    ) -> Result<Self, GameError> {
        let challenge_rating = average_party_level + difficulty as u32;
        if challenge_rating > PACKED_FIELD_MAX {
            return Err(GameError::InvalidPackedValue(challenge_rating));
        }
        Ok(Self {
            adventure_type,
            difficulty,
            challenge_rating,
            average_party_level,
        })
    }

    pub fn param1(&self) -> u32 {
        self.adventure_type as u32 * 1000 + self.challenge_rating
    }

    pub fn param2(&self) -> u32 {
        self.difficulty as u32 * 1000 + self.average_party_level
    }

    pub fn from_packed(param1: u32, param2: u32) -> Result<Self, GameError> {
        for value in [param1, param2] {
            if value > 9999 {
                return Err(GameError::InvalidPackedValue(value));
            }
        }
        Ok(Self {
            adventure_type: AdventureType::try_from(param1 / 1000)?,
            difficulty: DifficultyType::try_from(param2 / 1000)?,
            challenge_rating: param1 % 1000,
            average_party_level: param2 % 1000,
        })
    }

    /// Coins burned to the mirror address for this interaction
    pub fn burn_amount(&self) -> f64 {
        self.param1() as f64 / 10_000.0
    }

    /// Fee added on top of the base transaction fee
    pub fn burn_fee(&self) -> f64 {
        self.param2() as f64 / 100_000_000.0
    }
}

/// Concrete adventure content
#[derive(Debug, Clone, PartialEq)]
pub enum AdventureKind {
    TestEncounter(SimpleCombat),
    DungeonCrawl(Dungeon),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Adventure {
    pub id: AdventureId,
    pub action: AdventureAction,
    pub state: AdventureState,
    pub kind: AdventureKind,
    pub events: Vec<DomainEvent>,
}

impl Adventure {
    pub fn new(action: AdventureAction, kind: AdventureKind) -> Self {
        Self {
            id: AdventureId::new(),
            action,
            state: AdventureState::Creation,
            kind,
            events: Vec::new(),
        }
    }

    /// Advance the adventure with one shift.
    ///
    /// A fresh adventure is set up and run within the same step. A dungeon
    /// crawl fights one room per step and keeps running until its last room
    /// is cleared. Terminal adventures ignore further steps.
    pub fn next_step(&mut self, mogwai: &mut Mogwai, shift: &Shift) -> AdventureState {
        if self.state.is_terminal() {
            return self.state;
        }
        let metadata = EventMetadata::from(shift);

        if self.state == AdventureState::Creation {
            if let AdventureKind::DungeonCrawl(dungeon) = &mut self.kind {
                dungeon.open_entrance();
            }
            mogwai.set_state(MogwaiState::Adventure);
            self.transition(AdventureState::Running, metadata);
        }

        if self.state == AdventureState::Running {
            let max_rounds = mogwai.rules().max_combat_rounds;
            let outcome = match &mut self.kind {
                AdventureKind::TestEncounter(combat) => combat.run(mogwai, shift, max_rounds),
                AdventureKind::DungeonCrawl(dungeon) => dungeon.enter(mogwai, shift, max_rounds),
            };

            let next = match outcome {
                Ok(CombatOutcome { hero_won, rounds }) => {
                    self.events.push(DomainEvent::CombatEnded {
                        metadata,
                        rounds,
                        hero_won,
                    });
                    match &self.kind {
                        _ if !hero_won => AdventureState::Failed,
                        AdventureKind::DungeonCrawl(dungeon) if !dungeon.is_cleared() => AdventureState::Running,
                        _ => AdventureState::Completed,
                    }
                }
                Err(e) => {
                    warn!(adventure_id = %self.id, error = %e, "Adventure step failed");
                    AdventureState::Failed
                }
            };

            if next.is_terminal() {
                if mogwai.state() == MogwaiState::Adventure {
                    mogwai.set_state(MogwaiState::Idle);
                }
                self.transition(next, metadata);
            }
        }

        self.state
    }

    fn transition(&mut self, to: AdventureState, metadata: EventMetadata) {
        debug!(adventure_id = %self.id, from = ?self.state, to = ?to, "Adventure state changed");
        self.events.push(DomainEvent::AdventureStateChanged {
            metadata,
            adventure_id: self.id,
            from: self.state,
            to,
        });
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Entity, Monster};
    use crate::domain::value_objects::GameRules;
    use crate::test_support::{history, ADDRESS};

    #[test]
    fn test_packed_round_trip() {
        let action = AdventureAction::new(AdventureType::Battle, DifficultyType::Easy, 5).unwrap();
        assert_eq!(action.param1(), 2006);
        assert_eq!(action.param2(), 1005);

        let decoded = AdventureAction::from_packed(action.param1(), action.param2()).unwrap();
        assert_eq!(decoded, action);
    }

    #[test]
    fn test_decode_rejects_unknown_tags() {
        assert_eq!(
            AdventureAction::from_packed(7001, 1001),
            Err(GameError::InvalidPackedValue(7))
        );
        assert_eq!(
            AdventureAction::from_packed(10001, 1001),
            Err(GameError::InvalidPackedValue(10001))
        );
    }

    #[test]
    fn test_challenge_rating_must_fit() {
        assert!(AdventureAction::new(AdventureType::Dungeon, DifficultyType::Deadly, 995).is_err());
        assert!(AdventureAction::new(AdventureType::Dungeon, DifficultyType::Deadly, 994).is_ok());
    }

    #[test]
    fn test_burn_encoding() {
        let action = AdventureAction::new(AdventureType::TestRoom, DifficultyType::Average, 1).unwrap();
        assert_eq!(action.param1(), 3);
        assert_eq!(action.param2(), 2001);
        assert!((action.burn_amount() - 0.0003).abs() < 1e-12);
        assert!((action.burn_fee() - 0.00002001).abs() < 1e-15);
    }

    #[test]
    fn test_step_runs_to_terminal_state() {
        let shifts = history(100, 104);
        let mut mogwai = Mogwai::new(ADDRESS, shifts.clone(), GameRules::default()).unwrap();
        let action = AdventureAction::new(AdventureType::TestRoom, DifficultyType::Easy, 1).unwrap();
        let mut adventure = Adventure::new(
            action,
            AdventureKind::TestEncounter(SimpleCombat::new(vec![Monster::rat(), Monster::rat()])),
        );

        let state = adventure.next_step(&mut mogwai, &shifts[&104]);

        assert!(state.is_terminal());
        assert_ne!(mogwai.state(), MogwaiState::Adventure);
        assert!(matches!(
            adventure.events.first(),
            Some(DomainEvent::AdventureStateChanged {
                from: AdventureState::Creation,
                to: AdventureState::Running,
                ..
            })
        ));

        // terminal adventures ignore further steps
        let events = adventure.events.len();
        assert_eq!(adventure.next_step(&mut mogwai, &shifts[&103]), state);
        assert_eq!(adventure.events.len(), events);
    }

    #[test]
    fn test_dungeon_runs_one_room_per_step() {
        let shifts = history(100, 160);
        let steps: Vec<&Shift> = shifts.values().skip(1).collect();
        let mut multi_room_crawls = 0;

        for (start, creation) in steps.iter().enumerate() {
            let dungeon = Dungeon::generate(creation).unwrap();
            let rooms = dungeon.rooms().len();
            if rooms < 2 {
                continue;
            }
            multi_room_crawls += 1;

            let mut mogwai = Mogwai::new(ADDRESS, shifts.clone(), GameRules::default()).unwrap();
            let action = AdventureAction::new(AdventureType::Dungeon, DifficultyType::Easy, 1).unwrap();
            let mut adventure = Adventure::new(action, AdventureKind::DungeonCrawl(dungeon));

            let mut state = AdventureState::Creation;
            let mut taken = 0;
            for shift in steps.iter().cycle().skip(start).take(rooms) {
                state = adventure.next_step(&mut mogwai, shift);
                taken += 1;
                if state.is_terminal() {
                    break;
                }
                assert_eq!(state, AdventureState::Running);
                assert_eq!(mogwai.state(), MogwaiState::Adventure);
            }

            let AdventureKind::DungeonCrawl(dungeon) = &adventure.kind else {
                unreachable!()
            };
            let cleared = dungeon.rooms().iter().filter(|r| r.cleared).count();
            let fights = adventure
                .events
                .iter()
                .filter(|e| matches!(e, DomainEvent::CombatEnded { .. }))
                .count();
            assert_eq!(fights, taken);
            match state {
                AdventureState::Completed => assert_eq!(cleared, rooms),
                AdventureState::Failed => assert_eq!(cleared, taken - 1),
                other => panic!("crawl still {other:?} after {taken} steps"),
            }
            assert_ne!(mogwai.state(), MogwaiState::Adventure);
        }

        assert!(multi_room_crawls > 0);
    }

    #[test]
    fn test_same_shift_same_outcome() {
        let shifts = history(100, 104);
        let action = AdventureAction::new(AdventureType::TestRoom, DifficultyType::Easy, 1).unwrap();
        let run = || {
            let mut mogwai = Mogwai::new(ADDRESS, shifts.clone(), GameRules::default()).unwrap();
            let mut adventure = Adventure::new(
                action,
                AdventureKind::TestEncounter(SimpleCombat::new(vec![Monster::rat(), Monster::rat()])),
            );
            let state = adventure.next_step(&mut mogwai, &shifts[&102]);
            (state, mogwai.current_hit_points())
        };

        assert_eq!(run(), run());
    }
}
