use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Abilities, Attribute, Entity, EvolveReport, Mogwai, MogwaiState};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::BoundState;

#[derive(Debug, Default, Deserialize)]
pub struct MogwaiQueryDto {
    /// Evolve up to this height instead of the chain tip
    #[serde(default)]
    pub height: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct MogwaiResponseDto {
    pub address: String,
    pub bound_state: BoundState,
    pub mogwai: Option<MogwaiSummaryDto>,
    pub evolve: Option<EvolveResponseDto>,
}

#[derive(Debug, Serialize)]
pub struct MogwaiSummaryDto {
    pub name: String,
    pub birth_height: u64,
    pub pointer: u64,
    pub level: u32,
    pub exp: f64,
    /// Total experience the next level is reached at
    pub next_level_exp: f64,
    pub state: MogwaiState,
    pub gender: i32,
    pub abilities: Abilities,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub hit_points: i32,
    pub max_hit_points: i32,
    pub hit_point_die: u32,
    pub hit_point_rolls: Vec<u32>,
    /// Height at which each level was reached
    pub level_heights: BTreeMap<u32, u64>,
    pub experience_patterns: Vec<String>,
    pub body: Vec<Attribute>,
    pub coat: Vec<Attribute>,
    pub stats: Vec<Attribute>,
    pub shift_count: usize,
}

impl From<&Mogwai> for MogwaiSummaryDto {
    fn from(m: &Mogwai) -> Self {
        Self {
            name: m.name().to_string(),
            birth_height: m.birth_height(),
            pointer: m.pointer(),
            level: m.current_level(),
            exp: m.exp(),
            next_level_exp: m.rules().xp_to_level_up(m.current_level()),
            state: m.state(),
            gender: m.gender(),
            abilities: *m.abilities(),
            armor_class: m.armor_class(),
            attack_bonus: m.attack_bonus(),
            hit_points: m.current_hit_points(),
            max_hit_points: m.max_hit_points(),
            hit_point_die: m.hit_point_dice(),
            hit_point_rolls: m.hit_point_level_rolls().to_vec(),
            level_heights: m
                .level_shifts()
                .iter()
                .map(|(level, shift)| (*level, shift.height))
                .collect(),
            experience_patterns: m.experience().patterns().to_vec(),
            body: m.body().all.clone(),
            coat: m.coat().all.clone(),
            stats: m.stats().all.clone(),
            shift_count: m.shifts().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EvolveResponseDto {
    pub from: u64,
    pub to: u64,
    pub events: Vec<DomainEvent>,
}

impl From<EvolveReport> for EvolveResponseDto {
    fn from(r: EvolveReport) -> Self {
        Self {
            from: r.from,
            to: r.to,
            events: r.events,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BurnResponseDto {
    pub tx_id: String,
}

#[derive(Debug, Serialize)]
pub struct FundsResponseDto {
    pub address: String,
    /// Spendable with the minimum confirmations a burn needs
    pub spendable: f64,
    pub unconfirmed: f64,
    pub confirming: f64,
}
