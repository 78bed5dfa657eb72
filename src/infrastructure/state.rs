//! Shared application state

use std::sync::Arc;

use anyhow::Result;

use crate::application::ports::outbound::NodeQueryPort;
use crate::application::services::{BlockCacheService, MogwaiService};
use crate::domain::value_objects::GameRules;
use crate::infrastructure::block_store::BlockStoreBackend;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::node_client::MogwaicoinClient;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub block_cache: Arc<BlockCacheService>,
    pub mogwai_service: Arc<MogwaiService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        // Node RPC client
        let node: Arc<dyn NodeQueryPort> = Arc::new(MogwaicoinClient::new(
            &config.rpc_url,
            &config.rpc_user,
            &config.rpc_password,
            config.wallet_password.clone(),
        ));

        // Block hash cache, restored from its store
        let store = BlockStoreBackend::connect(&config.database_url).await?;
        let block_cache = Arc::new(BlockCacheService::new(
            node.clone(),
            store,
            config.cache_fetch_concurrency,
        ));
        block_cache.load().await?;

        let rules = GameRules::from_env();
        tracing::info!(?rules, "Game rules loaded");

        let mogwai_service = Arc::new(MogwaiService::new(
            node,
            block_cache.clone(),
            rules,
            config.tx_page_size,
        ));

        Ok(Self {
            config,
            block_cache,
            mogwai_service,
        })
    }
}
