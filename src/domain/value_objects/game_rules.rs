//! Tunable game constants
//!
//! Every client replaying the same chain must use the same rules, so these
//! are plain values with fixed defaults. Overrides exist for test networks.

use serde::{Deserialize, Serialize};

/// Constants shared by reconstruction, progression and combat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GameRules {
    // Binding
    /// Minimum burn that creates a mogwai
    pub mogwai_cost: f64,
    /// Base fee added to every burn
    pub tx_fee: f64,

    // Progression
    pub xp_per_level: f64,
    pub hit_point_die: u32,
    /// Width of the hex windows scanned for experience patterns
    pub exp_pattern_width: usize,
    /// Number of patterns a mogwai is born with
    pub exp_pattern_count: usize,
    /// Experience per matching window, multiplied by the current level
    pub pattern_exp: f64,
    /// Experience for a window made of one repeated nibble
    pub jackpot_exp: f64,
    /// Regeneration multiplier applied on small shifts
    pub small_shift_regeneration: i32,

    // Combat
    pub max_combat_rounds: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            mogwai_cost: 1.0,
            tx_fee: 0.0001,
            xp_per_level: 1000.0,
            hit_point_die: 8,
            exp_pattern_width: 4,
            exp_pattern_count: 4,
            pattern_exp: 100.0,
            jackpot_exp: 250.0,
            small_shift_regeneration: 2,
            max_combat_rounds: 20,
        }
    }
}

impl GameRules {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mogwai_cost: env_or("MOGWAI_COST", defaults.mogwai_cost),
            tx_fee: env_or("MOGWAI_TX_FEE", defaults.tx_fee),
            xp_per_level: env_or("MOGWAI_XP_PER_LEVEL", defaults.xp_per_level),
            hit_point_die: env_or("MOGWAI_HIT_POINT_DIE", defaults.hit_point_die),
            exp_pattern_width: env_or("MOGWAI_EXP_PATTERN_WIDTH", defaults.exp_pattern_width),
            exp_pattern_count: env_or("MOGWAI_EXP_PATTERN_COUNT", defaults.exp_pattern_count),
            pattern_exp: env_or("MOGWAI_PATTERN_EXP", defaults.pattern_exp),
            jackpot_exp: env_or("MOGWAI_JACKPOT_EXP", defaults.jackpot_exp),
            small_shift_regeneration: env_or("MOGWAI_SMALL_SHIFT_REGENERATION", defaults.small_shift_regeneration),
            max_combat_rounds: env_or("MOGWAI_MAX_COMBAT_ROUNDS", defaults.max_combat_rounds),
        }
        .sanitized()
    }

    /// Clamp values that would stall progression or combat
    pub fn sanitized(mut self) -> Self {
        if self.xp_per_level.is_nan() || self.xp_per_level <= 0.0 {
            self.xp_per_level = Self::default().xp_per_level;
        }
        self.hit_point_die = self.hit_point_die.max(1);
        self.exp_pattern_width = self.exp_pattern_width.max(2);
        self.max_combat_rounds = self.max_combat_rounds.max(1);
        self
    }

    /// Experience needed to leave `level`
    pub fn xp_to_level_up(&self, level: u32) -> f64 {
        level as f64 * self.xp_per_level
    }

    /// Level held with `exp` in total, the first one whose threshold is
    /// still above it
    pub fn level_for_exp(&self, exp: f64) -> u32 {
        // float to int casts saturate
        ((exp / self.xp_per_level).floor() as u32).saturating_add(1)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_threshold_is_linear() {
        let rules = GameRules::default();
        assert_eq!(rules.xp_to_level_up(1), 1000.0);
        assert_eq!(rules.xp_to_level_up(3), 3000.0);
    }

    #[test]
    fn test_level_for_exp() {
        let rules = GameRules::default();
        assert_eq!(rules.level_for_exp(0.0), 1);
        assert_eq!(rules.level_for_exp(999.9), 1);
        assert_eq!(rules.level_for_exp(1000.0), 2);
        assert_eq!(rules.level_for_exp(3500.0), 4);
        assert_eq!(rules.level_for_exp(f64::MAX), u32::MAX);
    }

    #[test]
    fn test_sanitized_rejects_stalling_values() {
        let rules = GameRules {
            xp_per_level: 0.0,
            hit_point_die: 0,
            max_combat_rounds: 0,
            ..GameRules::default()
        }
        .sanitized();

        assert_eq!(rules.xp_per_level, 1000.0);
        assert_eq!(rules.hit_point_die, 1);
        assert_eq!(rules.max_combat_rounds, 1);
    }
}
