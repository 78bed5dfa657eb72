//! Shared fixtures for unit tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::outbound::{
    BlockInfo, MirrorAddressInfo, NodeError, NodeQueryPort, RawInput, SignedTransaction, UnspentOutput,
};
use crate::domain::entities::{LocatedBurn, Shift, ShiftHistory};
use crate::domain::value_objects::{HexValue, TxCategory, WalletTransaction};

pub const ADDRESS: &str = "MQ6JnKWAiDkN2eo6c19647RBRzUecryRdP";
pub const ADDRESS_HEX: &str = "32b19db9a389dc6f62c2a1809ea3cdcd4c3a91c68919d0e50e";
pub const MIRROR: &str = "MFTHxujEGC7AHNBMCWQCuXZgVurWjLKc5e";

/// A plausible proof-of-work hash for `height`
pub fn block_hash(height: u64) -> String {
    let digest = HexValue::new("block", &[height.to_string().as_str()]);
    format!("00000000{}", &digest.as_str()[8..])
}

pub fn tx_hash(seed: u64) -> String {
    HexValue::new("tx", &[seed.to_string().as_str()]).as_str().to_string()
}

pub fn burn_at(height: u64, block_index: u32) -> LocatedBurn {
    LocatedBurn {
        tx_id: tx_hash(height * 100 + block_index as u64),
        time: block_time(height),
        height,
        block_hash: block_hash(height),
        block_index,
        amount: 1.0,
        fee: 0.0001,
    }
}

/// Creation burn at `birth` followed by small shifts up to `last`
pub fn history(birth: u64, last: u64) -> ShiftHistory {
    let mut shifts = ShiftHistory::new();
    shifts.insert(birth, Shift::from_burn(0, ADDRESS_HEX, &burn_at(birth, 1)));
    for height in birth + 1..=last {
        shifts.insert(height, Shift::small(height - birth, ADDRESS_HEX, height, block_hash(height)));
    }
    shifts
}

fn block_time(height: u64) -> i64 {
    1_530_000_000 + height as i64 * 120
}

/// Confirmed burn of `amount` to the mirror address, mined at `height`
pub fn confirmed_burn(height: u64, block_index: u32, amount: f64) -> WalletTransaction {
    WalletTransaction {
        address: MIRROR.to_string(),
        category: TxCategory::Send,
        amount: -amount,
        fee: -0.0001,
        time: block_time(height),
        block_hash: Some(block_hash(height)),
        block_index: Some(block_index),
        confirmations: 10,
        tx_id: tx_hash(height * 100 + block_index as u64),
    }
}

/// Burn still waiting for its first block
pub fn pending_burn(seed: u64, amount: f64) -> WalletTransaction {
    WalletTransaction {
        address: MIRROR.to_string(),
        category: TxCategory::Send,
        amount: -amount,
        fee: -0.0001,
        time: 1_900_000_000 + seed as i64,
        block_hash: None,
        block_index: None,
        confirmations: 0,
        tx_id: tx_hash(seed),
    }
}

/// Incoming payment to the bound address
pub fn receive(seed: u64, amount: f64, confirmations: i64) -> WalletTransaction {
    WalletTransaction {
        address: ADDRESS.to_string(),
        category: TxCategory::Receive,
        amount,
        fee: 0.0,
        time: 1_800_000_000 + seed as i64,
        block_hash: (confirmations > 0).then(|| block_hash(seed)),
        block_index: (confirmations > 0).then_some(1),
        confirmations,
        tx_id: tx_hash(10_000 + seed),
    }
}

pub fn unspent(tx_id: &str, amount: f64, confirmations: i64) -> UnspentOutput {
    UnspentOutput {
        tx_id: tx_id.to_string(),
        vout: 0,
        address: ADDRESS.to_string(),
        amount,
        confirmations,
    }
}

type CreatedTransaction = (Vec<RawInput>, BTreeMap<String, f64>);

#[derive(Default)]
struct FakeNodeState {
    block_count: u64,
    failing_heights: BTreeSet<u64>,
    transactions: Vec<WalletTransaction>,
    unspent: Vec<UnspentOutput>,
    created: Vec<CreatedTransaction>,
}

/// In-process node whose block hashes come from [`block_hash`]
#[derive(Default)]
pub struct FakeNode {
    state: Mutex<FakeNodeState>,
}

impl FakeNode {
    pub fn with_block_count(block_count: u64) -> Self {
        let node = Self::default();
        node.set_block_count(block_count);
        node
    }

    pub fn set_block_count(&self, block_count: u64) {
        self.state.lock().unwrap().block_count = block_count;
    }

    pub fn fail_block_hash_at(&self, height: u64) {
        self.state.lock().unwrap().failing_heights.insert(height);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failing_heights.clear();
    }

    pub fn add_transaction(&self, tx: WalletTransaction) {
        self.state.lock().unwrap().transactions.push(tx);
    }

    pub fn add_unspent(&self, output: UnspentOutput) {
        self.state.lock().unwrap().unspent.push(output);
    }

    pub fn created_transactions(&self) -> Vec<CreatedTransaction> {
        self.state.lock().unwrap().created.clone()
    }
}

#[async_trait]
impl NodeQueryPort for FakeNode {
    async fn get_block_count(&self) -> Result<u64, NodeError> {
        Ok(self.state.lock().unwrap().block_count)
    }

    async fn get_block_hash(&self, height: u64) -> Result<String, NodeError> {
        let state = self.state.lock().unwrap();
        if state.failing_heights.contains(&height) {
            return Err(NodeError::Transport("connection reset".to_string()));
        }
        if height >= state.block_count {
            return Err(NodeError::Rpc {
                code: -8,
                message: "Block height out of range".to_string(),
            });
        }
        Ok(block_hash(height))
    }

    async fn get_block(&self, hash: &str) -> Result<BlockInfo, NodeError> {
        let block_count = self.state.lock().unwrap().block_count;
        (0..block_count)
            .find(|h| block_hash(*h) == hash)
            .map(|height| BlockInfo {
                height,
                hash: hash.to_string(),
            })
            .ok_or_else(|| NodeError::Rpc {
                code: -5,
                message: "Block not found".to_string(),
            })
    }

    async fn list_transactions(&self, _account: &str, count: usize, skip: usize) -> Result<Vec<WalletTransaction>, NodeError> {
        let state = self.state.lock().unwrap();
        Ok(state.transactions.iter().skip(skip).take(count).cloned().collect())
    }

    async fn mirror_address(&self, address: &str) -> Result<MirrorAddressInfo, NodeError> {
        let known = address == ADDRESS;
        Ok(MirrorAddressInfo {
            is_mine: known,
            is_valid: known,
            is_mirror_valid: known,
            mirror_address: if known { MIRROR.to_string() } else { String::new() },
        })
    }

    async fn list_unspent(
        &self,
        min_confirmations: u32,
        max_confirmations: u32,
        addresses: &[String],
    ) -> Result<Vec<UnspentOutput>, NodeError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .unspent
            .iter()
            .filter(|u| u.confirmations >= min_confirmations as i64 && u.confirmations <= max_confirmations as i64)
            .filter(|u| addresses.contains(&u.address))
            .cloned()
            .collect())
    }

    async fn create_raw_transaction(
        &self,
        inputs: &[RawInput],
        outputs: &BTreeMap<String, f64>,
    ) -> Result<String, NodeError> {
        let mut state = self.state.lock().unwrap();
        state.created.push((inputs.to_vec(), outputs.clone()));
        Ok(format!("raw:{}", state.created.len()))
    }

    async fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, NodeError> {
        Ok(SignedTransaction {
            hex: format!("signed:{hex}"),
            complete: true,
        })
    }

    async fn send_raw_transaction(&self, hex: &str) -> Result<String, NodeError> {
        Ok(HexValue::new("sent", &[hex]).as_str().to_string())
    }
}
