//! Experience gained per shift
//!
//! A mogwai is born with a handful of short hex patterns. Every replayed shift
//! splits its experience hex into fixed-width windows; windows that open with
//! one of the mogwai's patterns earn experience, and windows made of a single
//! repeated nibble earn the jackpot. The sum is scaled by the current level.

use serde::{Deserialize, Serialize};

use crate::domain::entities::Shift;
use crate::domain::value_objects::GameRules;

/// Digest key for the experience patterns
pub const EXPERIENCE_KEY: &str = "mogwai-experience";

/// Nibbles per pattern
const PATTERN_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    patterns: Vec<String>,
}

impl Experience {
    /// Derive the birth patterns from the creation shift
    pub fn new(creation_shift: &Shift, rules: &GameRules) -> Self {
        let digest = creation_shift.hex_value(EXPERIENCE_KEY);
        let patterns = digest
            .as_str()
            .as_bytes()
            .chunks(PATTERN_LENGTH)
            .take(rules.exp_pattern_count)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .map(str::to_string)
            .collect();

        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Experience granted by `shift` at `level`; never negative
    pub fn get_exp(&self, level: u32, shift: &Shift, rules: &GameRules) -> f64 {
        let base: f64 = exp_windows(shift.experience_hex(), rules.exp_pattern_width)
            .map(|window| self.window_exp(window, rules))
            .sum();

        base * level as f64
    }

    fn window_exp(&self, window: &str, rules: &GameRules) -> f64 {
        let mut exp = 0.0;
        if self.patterns.iter().any(|p| window.starts_with(p.as_str())) {
            exp += rules.pattern_exp;
        }
        if is_repeated_nibble(window) {
            exp += rules.jackpot_exp;
        }
        exp
    }
}

/// Split `hex` into full windows of `width` characters; a trailing partial
/// window is dropped
pub fn exp_windows(hex: &str, width: usize) -> impl Iterator<Item = &str> {
    hex.as_bytes()
        .chunks_exact(width.max(1))
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
}

fn is_repeated_nibble(window: &str) -> bool {
    let mut chars = window.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}
