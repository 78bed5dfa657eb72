//! Wallet transaction records as reported by the node

use serde::{Deserialize, Serialize};

/// Direction of a wallet transaction entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxCategory {
    Send,
    Receive,
    Generate,
    Immature,
    Orphan,
    #[serde(other)]
    Other,
}

/// One entry of the node's `listtransactions` output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub address: String,
    pub category: TxCategory,
    /// Signed amount; outgoing entries are negative
    pub amount: f64,
    /// Signed fee; only present on outgoing entries
    pub fee: f64,
    /// Unix timestamp in seconds
    pub time: i64,
    pub block_hash: Option<String>,
    pub block_index: Option<u32>,
    pub confirmations: i64,
    pub tx_id: String,
}

impl WalletTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmations > 0 && self.block_hash.is_some()
    }

    /// An outgoing burn to `mirror_address`
    pub fn is_burn_to(&self, mirror_address: &str) -> bool {
        self.category == TxCategory::Send && self.address == mirror_address
    }
}

/// Binding state of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoundState {
    /// No qualifying burn and nothing pending
    None,
    /// Burns are pending confirmation, creation not final yet
    Wait,
    /// A confirmed creation shift exists
    Bound,
}

impl BoundState {
    pub fn classify(shift_count: usize, has_unconfirmed: bool) -> Self {
        match (shift_count, has_unconfirmed) {
            (0, true) => Self::Wait,
            (0, false) => Self::None,
            _ => Self::Bound,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Wait => "WAIT",
            Self::Bound => "BOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_state_classification() {
        assert_eq!(BoundState::classify(0, false), BoundState::None);
        assert_eq!(BoundState::classify(0, true), BoundState::Wait);
        assert_eq!(BoundState::classify(3, true), BoundState::Bound);
    }

    #[test]
    fn test_category_deserializes_unknown_as_other() {
        let category: TxCategory = serde_json::from_str("\"move\"").unwrap();
        assert_eq!(category, TxCategory::Other);
        let category: TxCategory = serde_json::from_str("\"send\"").unwrap();
        assert_eq!(category, TxCategory::Send);
    }
}
