//! Node query port - Interface to the chain node's wallet RPC
//!
//! The application treats every answer as authoritative; nothing here is
//! validated against consensus rules.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::WalletTransaction;

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("Node transport error: {0}")]
    Transport(String),
    #[error("Node RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Failed to decode node response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u64,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorAddressInfo {
    pub is_mine: bool,
    pub is_valid: bool,
    pub is_mirror_valid: bool,
    pub mirror_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub tx_id: String,
    pub vout: u32,
    pub address: String,
    pub amount: f64,
    pub confirmations: i64,
}

/// Reference to an output being spent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    pub txid: String,
    pub vout: u32,
}

impl From<&UnspentOutput> for RawInput {
    fn from(output: &UnspentOutput) -> Self {
        Self {
            txid: output.tx_id.clone(),
            vout: output.vout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub hex: String,
    pub complete: bool,
}

#[async_trait]
pub trait NodeQueryPort: Send + Sync {
    // =========================================================================
    // Chain
    // =========================================================================

    async fn get_block_count(&self) -> Result<u64, NodeError>;

    async fn get_block_hash(&self, height: u64) -> Result<String, NodeError>;

    async fn get_block(&self, hash: &str) -> Result<BlockInfo, NodeError>;

    // =========================================================================
    // Wallet
    // =========================================================================

    /// One page of wallet transactions for `account`, newest last
    async fn list_transactions(
        &self,
        account: &str,
        count: usize,
        skip: usize,
    ) -> Result<Vec<WalletTransaction>, NodeError>;

    async fn mirror_address(&self, address: &str) -> Result<MirrorAddressInfo, NodeError>;

    async fn list_unspent(
        &self,
        min_confirmations: u32,
        max_confirmations: u32,
        addresses: &[String],
    ) -> Result<Vec<UnspentOutput>, NodeError>;

    // =========================================================================
    // Raw transactions
    // =========================================================================

    /// Build an unsigned transaction, returning its hex
    async fn create_raw_transaction(
        &self,
        inputs: &[RawInput],
        outputs: &BTreeMap<String, f64>,
    ) -> Result<String, NodeError>;

    async fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, NodeError>;

    /// Broadcast a signed transaction, returning its id
    async fn send_raw_transaction(&self, hex: &str) -> Result<String, NodeError>;
}
