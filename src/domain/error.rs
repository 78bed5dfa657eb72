//! Domain errors raised by the deterministic game rules

use thiserror::Error;

use crate::domain::entities::AdventureType;

/// Errors produced by the game rules.
///
/// None of these are recoverable inside the domain; callers decide whether to
/// re-cache, retry, or surface a failed adventure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// A draw source ran out of hex input before a draw could be satisfied
    #[error("entropy exhausted: draw needed {requested} nibbles, {remaining} left")]
    EntropyExhausted { requested: usize, remaining: usize },

    /// Reconstruction needed a block hash that is not cached yet
    #[error("no cached block hash for height {height}")]
    MissingCachedBlock { height: u64 },

    /// The adventure generator has no implementation for this type
    #[error("unsupported adventure type: {0:?}")]
    UnsupportedAdventureType(AdventureType),

    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    #[error("a mogwai needs at least its creation shift")]
    EmptyShiftHistory,

    #[error("invalid mogwai address: {0}")]
    InvalidAddress(String),

    /// A packed adventure parameter does not decode to a known enum tag
    #[error("invalid packed adventure value: {0}")]
    InvalidPackedValue(u32),
}
