//! Background worker keeping the block hash cache in step with the chain

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::BlockCacheService;

/// Sync the cache, then wait `interval`, forever. Failures are logged and
/// retried on the next tick.
pub async fn block_cache_worker(cache: Arc<BlockCacheService>, interval: Duration) {
    tracing::info!("Starting block cache worker");
    loop {
        match cache.sync().await {
            Ok(report) if report.fetched > 0 => {
                tracing::debug!("Block cache worker fetched {} hashes", report.fetched);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Block cache sync failed: {:#}", e);
            }
        }
        tokio::time::sleep(interval).await;
    }
}
