//! Domain events - Notifications of significant state changes
//!
//! Events are stamped with the block height of the shift that caused them,
//! never with wall-clock time, so replaying the same shifts yields the same
//! event list.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AdventureState, Shift};
use crate::domain::value_objects::AdventureId;

/// Base data for all events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Height of the shift being applied
    pub height: u64,
    /// Ordinal of that shift in the mogwai's history
    pub shift_index: u64,
}

impl From<&Shift> for EventMetadata {
    fn from(shift: &Shift) -> Self {
        Self {
            height: shift.height,
            shift_index: shift.index,
        }
    }
}

/// All domain events in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    // ========================================================================
    // Progression Events
    // ========================================================================

    /// A shift granted experience
    ExperienceGained {
        metadata: EventMetadata,
        amount: f64,
        total: f64,
    },

    /// A level threshold was crossed
    LevelReached {
        metadata: EventMetadata,
        level: u32,
        hit_point_roll: u32,
    },

    /// Passive hit point regeneration
    Regenerated {
        metadata: EventMetadata,
        amount: i32,
        hit_points: i32,
    },

    // ========================================================================
    // Adventure Events
    // ========================================================================

    /// An adventure moved through its lifecycle
    AdventureStateChanged {
        metadata: EventMetadata,
        adventure_id: AdventureId,
        from: AdventureState,
        to: AdventureState,
    },

    /// An encounter finished
    CombatEnded {
        metadata: EventMetadata,
        rounds: u32,
        hero_won: bool,
    },
}

impl DomainEvent {
    /// Get the metadata for this event
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            DomainEvent::ExperienceGained { metadata, .. } => metadata,
            DomainEvent::LevelReached { metadata, .. } => metadata,
            DomainEvent::Regenerated { metadata, .. } => metadata,
            DomainEvent::AdventureStateChanged { metadata, .. } => metadata,
            DomainEvent::CombatEnded { metadata, .. } => metadata,
        }
    }

    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::ExperienceGained { .. } => "ExperienceGained",
            DomainEvent::LevelReached { .. } => "LevelReached",
            DomainEvent::Regenerated { .. } => "Regenerated",
            DomainEvent::AdventureStateChanged { .. } => "AdventureStateChanged",
            DomainEvent::CombatEnded { .. } => "CombatEnded",
        }
    }
}
