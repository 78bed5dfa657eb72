//! Value objects - Immutable objects defined by their attributes

mod address;
mod block_hash_cache;
mod dice;
mod game_rules;
mod hex_value;
mod ids;
mod wallet_transaction;
mod weapon;

pub use address::MogwaiAddress;
pub use block_hash_cache::BlockHashCache;
pub use dice::{Dice, RollEvent};
pub use game_rules::GameRules;
pub use hex_value::HexValue;
pub use ids::*;
pub use wallet_transaction::{BoundState, TxCategory, WalletTransaction};
pub use weapon::Weapon;
