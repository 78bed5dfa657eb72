use serde::{Deserialize, Serialize};

use crate::application::services::AdventureRun;
use crate::domain::entities::{AdventureAction, AdventureKind, AdventureState, AdventureType, DifficultyType};
use crate::domain::events::DomainEvent;

use super::{EvolveResponseDto, MogwaiSummaryDto};

#[derive(Debug, Deserialize)]
pub struct AdventureRequestDto {
    pub adventure_type: AdventureType,
    pub difficulty: DifficultyType,
    #[serde(default = "default_party_level")]
    pub average_party_level: u32,
    /// Play against the mogwai as of this height
    #[serde(default)]
    pub height: Option<u64>,
    /// Also burn the interaction on chain
    #[serde(default)]
    pub send: bool,
}

fn default_party_level() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct DecodeQueryDto {
    pub param1: u32,
    pub param2: u32,
}

#[derive(Debug, Serialize)]
pub struct AdventureActionDto {
    pub adventure_type: AdventureType,
    pub difficulty: DifficultyType,
    pub challenge_rating: u32,
    pub average_party_level: u32,
    pub param1: u32,
    pub param2: u32,
    pub burn_amount: f64,
    pub burn_fee: f64,
}

impl From<AdventureAction> for AdventureActionDto {
    fn from(a: AdventureAction) -> Self {
        Self {
            adventure_type: a.adventure_type,
            difficulty: a.difficulty,
            challenge_rating: a.challenge_rating,
            average_party_level: a.average_party_level,
            param1: a.param1(),
            param2: a.param2(),
            burn_amount: a.burn_amount(),
            burn_fee: a.burn_fee(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdventureResponseDto {
    pub id: String,
    pub action: AdventureActionDto,
    pub state: AdventureState,
    pub events: Vec<DomainEvent>,
    /// Room progress of a dungeon crawl
    pub dungeon: Option<DungeonProgressDto>,
    pub evolve: EvolveResponseDto,
    pub mogwai: MogwaiSummaryDto,
    /// Burn transaction when the interaction was sent
    pub tx_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DungeonProgressDto {
    pub rooms: usize,
    pub cleared: usize,
    pub current_room: Option<usize>,
}

impl From<AdventureRun> for AdventureResponseDto {
    fn from(run: AdventureRun) -> Self {
        let dungeon = match &run.adventure.kind {
            AdventureKind::DungeonCrawl(dungeon) => Some(DungeonProgressDto {
                rooms: dungeon.rooms().len(),
                cleared: dungeon.rooms().iter().filter(|r| r.cleared).count(),
                current_room: dungeon.current_room(),
            }),
            AdventureKind::TestEncounter(_) => None,
        };

        Self {
            id: run.adventure.id.to_string(),
            action: run.adventure.action.into(),
            state: run.adventure.state,
            events: run.adventure.events,
            dungeon,
            evolve: run.evolve.into(),
            mogwai: MogwaiSummaryDto::from(&run.mogwai),
            tx_id: None,
        }
    }
}
