//! Birth traits read from the creation shift's trait digest
//!
//! Body, coat and stats are opaque attribute blocks: each attribute reads a
//! fixed nibble window of the digest and folds it into its creation range.
//! They are computed once and never change.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::HexValue;

/// Digest key for birth traits
pub const TRAIT_KEY: &str = "mogwai-traits";

/// One named birth attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: u32,
    pub min_range: u32,
    /// Exclusive upper bound of values available at creation
    pub creation: u32,
    /// Exclusive upper bound the attribute can ever reach
    pub max_range: u32,
    pub valid: bool,
}

impl Attribute {
    pub fn is_valid(&self) -> bool {
        self.min_range <= self.value && self.value < self.creation && self.creation <= self.max_range
    }
}

/// Where an attribute sits in the digest and what it may hold
struct AttributeSpec {
    name: &'static str,
    position: usize,
    size: usize,
    min_range: u32,
    creation: u32,
    max_range: u32,
}

impl AttributeSpec {
    const fn new(name: &'static str, position: usize, size: usize, min_range: u32, creation: u32, max_range: u32) -> Self {
        Self {
            name,
            position,
            size,
            min_range,
            creation,
            max_range,
        }
    }

    fn read(&self, hex_value: &HexValue) -> Attribute {
        let span = (self.creation - self.min_range).max(1) as u64;
        let value = self.min_range + (hex_value.window(self.position, self.size) % span) as u32;
        let mut attribute = Attribute {
            name: self.name.to_string(),
            value,
            min_range: self.min_range,
            creation: self.creation,
            max_range: self.max_range,
            valid: false,
        };
        attribute.valid = attribute.is_valid();
        attribute
    }
}

const BODY: [AttributeSpec; 5] = [
    AttributeSpec::new("skin", 0, 2, 0, 8, 16),
    AttributeSpec::new("height", 2, 2, 0, 10, 16),
    AttributeSpec::new("weight", 4, 2, 0, 10, 16),
    AttributeSpec::new("ears", 6, 2, 0, 6, 12),
    AttributeSpec::new("eyes", 8, 2, 0, 12, 24),
];

const COAT: [AttributeSpec; 4] = [
    AttributeSpec::new("color", 10, 2, 0, 16, 64),
    AttributeSpec::new("pattern", 12, 2, 0, 8, 32),
    AttributeSpec::new("length", 14, 1, 0, 4, 8),
    AttributeSpec::new("shine", 15, 1, 0, 4, 8),
];

const STATS: [AttributeSpec; 4] = [
    AttributeSpec::new("fitness", 16, 2, 1, 11, 21),
    AttributeSpec::new("temper", 18, 2, 1, 11, 21),
    AttributeSpec::new("curiosity", 20, 2, 1, 11, 21),
    AttributeSpec::new("appetite", 22, 2, 1, 11, 21),
];

macro_rules! attribute_block {
    ($name:ident, $specs:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub all: Vec<Attribute>,
        }

        impl $name {
            pub fn new(hex_value: &HexValue) -> Self {
                Self {
                    all: $specs.iter().map(|spec| spec.read(hex_value)).collect(),
                }
            }
        }
    };
}

attribute_block!(Body, BODY);
attribute_block!(Coat, COAT);
attribute_block!(Stats, STATS);

const SYLLABLES: [&str; 16] = [
    "ka", "mo", "gwa", "zu", "ri", "ta", "shi", "no", "be", "lo", "ra", "mi", "to", "xe", "pu", "yn",
];

/// Deterministic name from the trait digest
pub fn generate_name(hex_value: &HexValue) -> String {
    let syllable_count = if hex_value.window(35, 1) % 2 == 0 { 3 } else { 2 };
    let name: String = (32..32 + syllable_count)
        .map(|position| SYLLABLES[hex_value.window(position, 1) as usize])
        .collect();

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}
