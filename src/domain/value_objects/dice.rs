//! Deterministic draw source keyed by hexadecimal chain data
//!
//! A `Dice` consumes its hex input strictly left to right. Every draw takes
//! the smallest number of nibbles whose combined range covers the die, parses
//! them as one big-endian number and maps it onto `[1, sides]` by modulo.
//! Nibbles are never reused: once the input runs out, every further draw
//! fails with [`GameError::EntropyExhausted`].

use crate::domain::error::GameError;

/// Shape of a composite ability roll: roll `count` dice of `sides` and keep
/// the highest `keep` of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollEvent {
    pub count: u32,
    pub sides: u32,
    pub keep: u32,
}

impl RollEvent {
    /// 4d6, keep the best three
    pub const ABILITY_SCORE: RollEvent = RollEvent {
        count: 4,
        sides: 6,
        keep: 3,
    };
}

/// Exhaustible pseudo-random draw source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dice {
    nibbles: Vec<u8>,
    position: usize,
}

impl Dice {
    /// Build a draw source from hex text. Case is ignored.
    pub fn new(hex: &str) -> Result<Self, GameError> {
        let nibbles = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| GameError::InvalidHex(hex.to_string()))?;

        Ok(Self {
            nibbles,
            position: 0,
        })
    }

    /// Nibbles not consumed yet
    pub fn remaining(&self) -> usize {
        self.nibbles.len() - self.position
    }

    /// Roll one die, result in `[1, sides]`
    pub fn roll(&mut self, sides: u32) -> Result<u32, GameError> {
        let width = Self::nibbles_per_draw(sides);
        self.ensure(width)?;
        Ok(self.draw(sides, width))
    }

    /// Roll `count` dice of `sides`, sum them and add `modifier`.
    ///
    /// The whole draw is checked against the remaining input first, so a
    /// failed roll leaves the source untouched.
    pub fn roll_with(&mut self, count: u32, sides: u32, modifier: i32) -> Result<i32, GameError> {
        let width = Self::nibbles_per_draw(sides);
        self.ensure(width * count as usize)?;

        let sum: i64 = (0..count).map(|_| self.draw(sides, width) as i64).sum();
        Ok((sum + modifier as i64) as i32)
    }

    /// Roll a composite event and keep the best dice.
    pub fn roll_event(&mut self, event: &RollEvent) -> Result<i32, GameError> {
        let width = Self::nibbles_per_draw(event.sides);
        self.ensure(width * event.count as usize)?;

        let mut rolls: Vec<u32> = (0..event.count)
            .map(|_| self.draw(event.sides, width))
            .collect();
        rolls.sort_unstable_by(|a, b| b.cmp(a));

        Ok(rolls.iter().take(event.keep as usize).sum::<u32>() as i32)
    }

    /// Smallest nibble count whose value range covers `sides`
    fn nibbles_per_draw(sides: u32) -> usize {
        let mut width = 1;
        let mut range: u64 = 16;
        while range < sides as u64 {
            width += 1;
            range *= 16;
        }
        width
    }

    fn ensure(&self, requested: usize) -> Result<(), GameError> {
        let remaining = self.remaining();
        if requested > remaining {
            return Err(GameError::EntropyExhausted {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    fn draw(&mut self, sides: u32, width: usize) -> u32 {
        let value = self.nibbles[self.position..self.position + width]
            .iter()
            .fold(0u64, |acc, n| (acc << 4) | *n as u64);
        self.position += width;

        (value % sides.max(1) as u64) as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_nibble_roll() {
        let mut dice = Dice::new("a").unwrap();
        assert_eq!(dice.roll(6).unwrap(), 5);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn test_exhaustion_fails_instead_of_wrapping() {
        let mut dice = Dice::new("a").unwrap();
        dice.roll(6).unwrap();

        assert_eq!(
            dice.roll(6),
            Err(GameError::EntropyExhausted {
                requested: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn test_wide_die_uses_two_nibbles() {
        let mut dice = Dice::new("ff01").unwrap();
        assert_eq!(dice.roll(20).unwrap(), 255 % 20 + 1);
        assert_eq!(dice.remaining(), 2);
        assert_eq!(dice.roll(20).unwrap(), 2);
    }

    #[test]
    fn test_roll_with_modifier() {
        let mut dice = Dice::new("0").unwrap();
        assert_eq!(dice.roll_with(1, 2, -1).unwrap(), 0);

        let mut dice = Dice::new("123").unwrap();
        assert_eq!(dice.roll_with(3, 4, 2).unwrap(), 2 + 3 + 4 + 2);
    }

    #[test]
    fn test_failed_multi_roll_consumes_nothing() {
        let mut dice = Dice::new("12").unwrap();
        assert!(dice.roll_with(3, 6, 0).is_err());
        assert_eq!(dice.remaining(), 2);
    }

    #[test]
    fn test_ability_roll_keeps_best_three() {
        // 4d6 draws: 0->1, 5->6, 2->3, b(11)->6
        let mut dice = Dice::new("052b").unwrap();
        assert_eq!(dice.roll_event(&RollEvent::ABILITY_SCORE).unwrap(), 6 + 6 + 3);
    }

    #[test]
    fn test_same_input_same_sequence() {
        let hex = "163d2e383c77765232be1d9ed5e06749";
        let mut a = Dice::new(hex).unwrap();
        let mut b = Dice::new(hex).unwrap();
        for sides in [2, 4, 6, 8, 10, 12, 20, 100] {
            assert_eq!(a.roll(sides), b.roll(sides));
        }
    }

    #[test]
    fn test_rejects_non_hex_input() {
        assert!(matches!(Dice::new("xyz"), Err(GameError::InvalidHex(_))));
    }
}
