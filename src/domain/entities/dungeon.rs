//! Dungeon crawl - a chain of monster rooms

use tracing::debug;

use crate::domain::entities::{Mogwai, Monster, Shift};
use crate::domain::error::GameError;
use crate::domain::services::{CombatOutcome, SimpleCombat};

/// Digest key for dungeon layout
pub const DUNGEON_KEY: &str = "mogwai-dungeon";

/// One room holding an encounter
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub encounter: SimpleCombat,
    pub cleared: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dungeon {
    rooms: Vec<Room>,
    /// Room the hero is standing in, `None` until the entrance is opened
    current_room: Option<usize>,
}

impl Dungeon {
    /// Lay out the rooms from the shift the adventure was created at
    pub fn generate(shift: &Shift) -> Result<Self, GameError> {
        let mut dice = shift.hex_value(DUNGEON_KEY).dice()?;
        let room_count = dice.roll(3)?;

        let mut rooms = Vec::with_capacity(room_count as usize);
        for room in 0..room_count as usize {
            let rats = dice.roll(2)?;
            let monsters = (0..rats).map(|_| Monster::rat()).collect();
            rooms.push(Room {
                encounter: SimpleCombat::staged(monsters, room),
                cleared: false,
            });
        }

        Ok(Self {
            rooms,
            current_room: None,
        })
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn current_room(&self) -> Option<usize> {
        self.current_room
    }

    pub fn open_entrance(&mut self) {
        if self.current_room.is_none() && !self.rooms.is_empty() {
            self.current_room = Some(0);
        }
    }

    /// Every room is cleared
    pub fn is_cleared(&self) -> bool {
        self.rooms.iter().all(|room| room.cleared)
    }

    /// Fight the encounter of the current room. A won room is cleared and
    /// the hero moves on to the next one.
    pub fn enter(&mut self, hero: &mut Mogwai, shift: &Shift, max_rounds: u32) -> Result<CombatOutcome, GameError> {
        self.open_entrance();
        let Some(index) = self.current_room else {
            return Ok(CombatOutcome { hero_won: true, rounds: 0 });
        };

        let room = &mut self.rooms[index];
        let outcome = room.encounter.run(hero, shift, max_rounds)?;
        if !outcome.hero_won {
            debug!(room = index, "Dungeon crawl lost");
            return Ok(outcome);
        }

        room.cleared = true;
        if index + 1 < self.rooms.len() {
            self.current_room = Some(index + 1);
            debug!(room = index, "Dungeon room cleared");
        } else {
            debug!(rooms = self.rooms.len(), "Dungeon cleared");
        }
        Ok(outcome)
    }
}
