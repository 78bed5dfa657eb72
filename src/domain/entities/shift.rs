//! Shift entity - one ordered event in a mogwai's life

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::GameError;
use crate::domain::value_objects::{Dice, HexValue, WalletTransaction};

/// Ordered shift sequence of one mogwai, keyed by block height
pub type ShiftHistory = BTreeMap<u64, Shift>;

/// A confirmed burn whose block height has been resolved by the node
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedBurn {
    pub tx_id: String,
    pub time: i64,
    pub height: u64,
    pub block_hash: String,
    pub block_index: u32,
    /// Burned amount, always positive
    pub amount: f64,
    /// Fee paid including the base burn fee, always positive
    pub fee: f64,
}

impl LocatedBurn {
    /// Locate a confirmed wallet transaction at `height`
    pub fn from_transaction(tx: &WalletTransaction, height: u64, base_fee: f64) -> Option<Self> {
        Some(Self {
            tx_id: tx.tx_id.clone(),
            time: tx.time,
            height,
            block_hash: tx.block_hash.clone()?,
            block_index: tx.block_index.unwrap_or(0),
            amount: tx.amount.abs(),
            fee: (tx.fee + base_fee).abs(),
        })
    }
}

/// One discrete event of a mogwai timeline.
///
/// Real shifts carry a burn transaction; small shifts stand for a block in
/// which nothing happened and only carry that block's hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub index: u64,
    pub time: Option<DateTime<Utc>>,
    pub height: u64,
    pub address_hex: String,
    pub block_hash_hex: String,
    pub tx_hash_hex: Option<String>,
    pub block_index: Option<u32>,
    pub amount: f64,
    pub fee: f64,
    pub is_small_shift: bool,
}

impl Shift {
    pub fn from_burn(index: u64, address_hex: impl Into<String>, burn: &LocatedBurn) -> Self {
        Self {
            index,
            time: DateTime::from_timestamp(burn.time, 0),
            height: burn.height,
            address_hex: address_hex.into(),
            block_hash_hex: burn.block_hash.clone(),
            tx_hash_hex: Some(burn.tx_id.clone()),
            block_index: Some(burn.block_index),
            amount: burn.amount,
            fee: burn.fee,
            is_small_shift: false,
        }
    }

    pub fn small(index: u64, address_hex: impl Into<String>, height: u64, block_hash: impl Into<String>) -> Self {
        Self {
            index,
            time: None,
            height,
            address_hex: address_hex.into(),
            block_hash_hex: block_hash.into(),
            tx_hash_hex: None,
            block_index: None,
            amount: 0.0,
            fee: 0.0,
            is_small_shift: true,
        }
    }

    /// Hex scanned for experience: the transaction hash, or the block hash
    /// without its proof-of-work zeros for small shifts
    pub fn experience_hex(&self) -> &str {
        match &self.tx_hash_hex {
            Some(tx) => tx,
            None => self.block_hash_hex.trim_start_matches('0'),
        }
    }

    /// Hex fed to this shift's draw source. Proof-of-work hashes start with
    /// a run of zeros, which is skipped.
    pub fn entropy_hex(&self) -> String {
        let block = self.block_hash_hex.trim_start_matches('0');
        match &self.tx_hash_hex {
            Some(tx) => format!("{tx}{block}"),
            None => block.to_string(),
        }
    }

    /// A fresh draw source over this shift's own hex.
    ///
    /// Each call starts from the first nibble, so rolls made for one purpose
    /// during a shift never depend on rolls made for another.
    pub fn dice(&self) -> Result<Dice, GameError> {
        Dice::new(&self.entropy_hex())
    }

    /// Digest of this shift under `key`
    pub fn hex_value(&self, key: &str) -> HexValue {
        HexValue::new(
            key,
            &[
                self.address_hex.as_str(),
                self.block_hash_hex.as_str(),
                self.tx_hash_hex.as_deref().unwrap_or_default(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TxCategory;

    fn burn_tx() -> WalletTransaction {
        WalletTransaction {
            address: "MQN7moivGfWPiwUfCX1PzfqqYN29gKsgEb".to_string(),
            category: TxCategory::Send,
            amount: -1.0,
            fee: -0.0002,
            time: 1530914381,
            block_hash: Some("00000000090d6c6b058227bb61ca2915a84998703d4444cc2641e6a0da4ba37e".to_string()),
            block_index: Some(2),
            confirmations: 12,
            tx_id: "163d2e383c77765232be1d9ed5e06749a814de49b4c0a8aebf324c0e9e2fd1cf".to_string(),
        }
    }

    #[test]
    fn test_burn_shift_fields() {
        let burn = LocatedBurn::from_transaction(&burn_tx(), 7234, 0.0001).unwrap();
        let shift = Shift::from_burn(0, "32ad", &burn);

        assert_eq!(shift.height, 7234);
        assert_eq!(shift.amount, 1.0);
        assert!((shift.fee - 0.0001).abs() < 1e-12);
        assert!(!shift.is_small_shift);
        assert_eq!(shift.time.unwrap().timestamp(), 1530914381);
        assert_eq!(shift.experience_hex(), burn.tx_id);
    }

    #[test]
    fn test_entropy_skips_leading_zeros() {
        let shift = Shift::small(3, "32ad", 10, "0000ab");
        assert_eq!(shift.entropy_hex(), "ab");
        assert_eq!(shift.experience_hex(), "ab");
        assert!(shift.is_small_shift);
    }

    #[test]
    fn test_dice_is_fresh_per_call() {
        let burn = LocatedBurn::from_transaction(&burn_tx(), 7234, 0.0001).unwrap();
        let shift = Shift::from_burn(0, "32ad", &burn);

        let mut first = shift.dice().unwrap();
        let mut second = shift.dice().unwrap();
        assert_eq!(first.roll(20).unwrap(), second.roll(20).unwrap());
    }
}
