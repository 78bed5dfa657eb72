//! Mogwaicoin node client - JSON-RPC adapter for the node query port

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::application::ports::outbound::{
    BlockInfo, MirrorAddressInfo, NodeError, NodeQueryPort, RawInput, SignedTransaction, UnspentOutput,
};
use crate::domain::value_objects::{TxCategory, WalletTransaction};

/// Seconds the wallet stays unlocked for one signature
const UNLOCK_SECONDS: u64 = 2;

/// Client for the node's wallet RPC
pub struct MogwaicoinClient {
    client: Client,
    url: String,
    user: String,
    password: String,
    wallet_password: Option<String>,
    next_id: AtomicU64,
}

impl MogwaicoinClient {
    pub fn new(url: &str, user: &str, password: &str, wallet_password: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.to_string(),
            wallet_password: wallet_password.filter(|p| !p.is_empty()),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T, NodeError> {
        let request = RpcRequest {
            jsonrpc: "1.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| NodeError::Transport(e.to_string()))?;

        // errors come back as 500 with a JSON-RPC body
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NodeError::Transport(e.to_string()))?;

        let parsed: RpcResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                NodeError::Decode(e.to_string())
            } else {
                NodeError::Transport(format!("{method}: HTTP {status}"))
            }
        })?;

        tracing::trace!(method, "Node RPC call completed");
        parsed.into_result()
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcResponse {
    fn into_result<T: DeserializeOwned>(self) -> Result<T, NodeError> {
        if let Some(error) = self.error {
            return Err(NodeError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        serde_json::from_value(self.result).map_err(|e| NodeError::Decode(e.to_string()))
    }
}

// =============================================================================
// Wire shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct BlockResponse {
    height: u64,
    hash: String,
}

#[derive(Debug, Deserialize)]
struct ListTransactionsEntry {
    #[serde(default)]
    address: String,
    category: TxCategory,
    amount: f64,
    #[serde(default)]
    fee: f64,
    time: i64,
    blockhash: Option<String>,
    blockindex: Option<u32>,
    #[serde(default)]
    confirmations: i64,
    txid: String,
}

impl From<ListTransactionsEntry> for WalletTransaction {
    fn from(entry: ListTransactionsEntry) -> Self {
        Self {
            address: entry.address,
            category: entry.category,
            amount: entry.amount,
            fee: entry.fee,
            time: entry.time,
            block_hash: entry.blockhash,
            block_index: entry.blockindex,
            confirmations: entry.confirmations,
            tx_id: entry.txid,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MirrorAddressResponse {
    #[serde(default)]
    ismine: bool,
    #[serde(default)]
    isvalid: bool,
    #[serde(default)]
    ismirrorvalid: bool,
    #[serde(default)]
    mirroraddress: String,
}

#[derive(Debug, Deserialize)]
struct UnspentEntry {
    txid: String,
    vout: u32,
    #[serde(default)]
    address: String,
    amount: f64,
    confirmations: i64,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    hex: String,
    complete: bool,
}

#[async_trait]
impl NodeQueryPort for MogwaicoinClient {
    async fn get_block_count(&self) -> Result<u64, NodeError> {
        self.call("getblockcount", vec![]).await
    }

    async fn get_block_hash(&self, height: u64) -> Result<String, NodeError> {
        self.call("getblockhash", vec![json!(height)]).await
    }

    async fn get_block(&self, hash: &str) -> Result<BlockInfo, NodeError> {
        let block: BlockResponse = self.call("getblock", vec![json!(hash)]).await?;
        Ok(BlockInfo {
            height: block.height,
            hash: block.hash,
        })
    }

    async fn list_transactions(&self, account: &str, count: usize, skip: usize) -> Result<Vec<WalletTransaction>, NodeError> {
        let entries: Vec<ListTransactionsEntry> = self
            .call("listtransactions", vec![json!(account), json!(count), json!(skip)])
            .await?;
        Ok(entries.into_iter().map(WalletTransaction::from).collect())
    }

    async fn mirror_address(&self, address: &str) -> Result<MirrorAddressInfo, NodeError> {
        let info: MirrorAddressResponse = self.call("mirroraddress", vec![json!(address)]).await?;
        Ok(MirrorAddressInfo {
            is_mine: info.ismine,
            is_valid: info.isvalid,
            is_mirror_valid: info.ismirrorvalid,
            mirror_address: info.mirroraddress,
        })
    }

    async fn list_unspent(
        &self,
        min_confirmations: u32,
        max_confirmations: u32,
        addresses: &[String],
    ) -> Result<Vec<UnspentOutput>, NodeError> {
        let entries: Vec<UnspentEntry> = self
            .call(
                "listunspent",
                vec![json!(min_confirmations), json!(max_confirmations), json!(addresses)],
            )
            .await?;

        Ok(entries
            .into_iter()
            .map(|u| UnspentOutput {
                tx_id: u.txid,
                vout: u.vout,
                address: u.address,
                amount: u.amount,
                confirmations: u.confirmations,
            })
            .collect())
    }

    async fn create_raw_transaction(
        &self,
        inputs: &[RawInput],
        outputs: &BTreeMap<String, f64>,
    ) -> Result<String, NodeError> {
        self.call("createrawtransaction", vec![json!(inputs), json!(outputs)])
            .await
    }

    async fn sign_raw_transaction(&self, hex: &str) -> Result<SignedTransaction, NodeError> {
        if let Some(password) = &self.wallet_password {
            let _: Value = self
                .call("walletpassphrase", vec![json!(password), json!(UNLOCK_SECONDS)])
                .await?;
        }

        let signed: SignResponse = self.call("signrawtransaction", vec![json!(hex)]).await?;
        Ok(SignedTransaction {
            hex: signed.hex,
            complete: signed.complete,
        })
    }

    async fn send_raw_transaction(&self, hex: &str) -> Result<String, NodeError> {
        self.call("sendrawtransaction", vec![json!(hex)]).await
    }
}
