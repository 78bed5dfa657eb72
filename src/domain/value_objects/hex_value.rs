//! Keyed hex digest of a shift

use sha2::{Digest, Sha256};

use crate::domain::error::GameError;
use crate::domain::value_objects::Dice;

/// A SHA-256 digest over a shift's hex fields, separated by a purpose key.
///
/// Different keys give independent digests of the same shift, so trait
/// generation never competes with gameplay rolls for nibbles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexValue {
    hex: String,
}

impl HexValue {
    pub fn new(key: &str, parts: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        for part in parts {
            hasher.update(b":");
            hasher.update(part.as_bytes());
        }
        Self {
            hex: hex::encode(hasher.finalize()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Parse `size` nibbles starting at `position`; windows past the end read
    /// as zero.
    pub fn window(&self, position: usize, size: usize) -> u64 {
        self.hex
            .chars()
            .skip(position)
            .take(size)
            .filter_map(|c| c.to_digit(16))
            .fold(0u64, |acc, d| (acc << 4) | d as u64)
    }

    /// A fresh draw source over the whole digest
    pub fn dice(&self) -> Result<Dice, GameError> {
        Dice::new(&self.hex)
    }
}
