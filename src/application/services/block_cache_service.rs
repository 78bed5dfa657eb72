//! Block cache service - keeps the height to hash cache in step with the node
//!
//! The in-memory [`BlockHashCache`] is the view reconstruction reads from;
//! the repository makes it survive restarts. A sync fetches every missing
//! height below the node's block count, concurrently but merged in height
//! order, and appends the unbroken prefix it got. Only one sync runs at a
//! time.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{BlockHashRepositoryPort, NodeQueryPort};
use crate::domain::value_objects::BlockHashCache;

/// Heights fetched per persisted batch
const SYNC_CHUNK: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub fetched: usize,
    pub max_height: Option<u64>,
    pub block_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub count: usize,
    pub max_height: Option<u64>,
    pub block_count: u64,
}

pub struct BlockCacheService {
    node: Arc<dyn NodeQueryPort>,
    repository: Arc<dyn BlockHashRepositoryPort>,
    cache: RwLock<BlockHashCache>,
    sync_lock: Mutex<()>,
    concurrency: usize,
}

impl BlockCacheService {
    pub fn new(
        node: Arc<dyn NodeQueryPort>,
        repository: Arc<dyn BlockHashRepositoryPort>,
        concurrency: usize,
    ) -> Self {
        Self {
            node,
            repository,
            cache: RwLock::new(BlockHashCache::new()),
            sync_lock: Mutex::new(()),
            concurrency: concurrency.max(1),
        }
    }

    /// Fill the in-memory cache from the repository
    pub async fn load(&self) -> Result<usize> {
        let entries = self
            .repository
            .load()
            .await
            .context("Failed to load cached block hashes")?;

        let loaded: BlockHashCache = entries.into_iter().collect();
        let count = loaded.len();
        if loaded.is_empty() {
            info!("Block hash cache is empty, the first sync starts at height zero");
        } else {
            info!(count, max_height = ?loaded.max_height(), "Block hash cache loaded");
        }
        *self.cache.write().await = loaded;
        Ok(count)
    }

    /// Read access for reconstruction
    pub async fn read(&self) -> RwLockReadGuard<'_, BlockHashCache> {
        self.cache.read().await
    }

    /// Fetch every height between the watermark and the node's block count.
    ///
    /// A failed fetch keeps everything below the failing height and reports
    /// the error; the next sync picks up from there.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Result<SyncReport> {
        let _guard = self.sync_lock.lock().await;

        let block_count = self
            .node
            .get_block_count()
            .await
            .context("Failed to get block count")?;
        let mut next = self.cache.read().await.next_height();
        let mut fetched = 0;

        while next < block_count {
            let end = (next + SYNC_CHUNK).min(block_count);
            let results: Vec<_> = stream::iter(next..end)
                .map(|height| {
                    let node = self.node.clone();
                    async move { node.get_block_hash(height).await.map(|hash| (height, hash)) }
                })
                .buffered(self.concurrency)
                .collect()
                .await;

            let mut entries = Vec::with_capacity(results.len());
            let mut failure = None;
            for result in results {
                match result {
                    Ok(entry) => entries.push(entry),
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }

            if !entries.is_empty() {
                self.repository
                    .append(&entries)
                    .await
                    .context("Failed to persist block hashes")?;

                let mut cache = self.cache.write().await;
                for (height, hash) in &entries {
                    cache.append(*height, hash.clone());
                }
            }
            fetched += entries.len();

            if let Some(e) = failure {
                let height = next + entries.len() as u64;
                return Err(anyhow::Error::new(e).context(format!("Failed to fetch block hash at height {height}")));
            }

            debug!(from = next, to = end, "Cached block hash chunk");
            next = end;
        }

        let max_height = self.cache.read().await.max_height();
        if fetched > 0 {
            info!(fetched, ?max_height, block_count, "Block hash cache synced");
        }
        Ok(SyncReport {
            fetched,
            max_height,
            block_count,
        })
    }

    /// Drop everything cached, in memory and in the repository
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.sync_lock.lock().await;
        self.repository
            .clear()
            .await
            .context("Failed to clear block hash repository")?;
        *self.cache.write().await = BlockHashCache::new();

        info!("Block hash cache cleared");
        Ok(())
    }

    /// Clear and re-cache from height zero
    pub async fn resync(&self) -> Result<SyncReport> {
        self.clear().await?;
        self.sync().await
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        let block_count = self
            .node
            .get_block_count()
            .await
            .context("Failed to get block count")?;
        let cache = self.cache.read().await;

        Ok(CacheStats {
            count: cache.len(),
            max_height: cache.max_height(),
            block_count,
        })
    }

    /// Cached hashes in `from..to` containing any of `patterns`, or all of
    /// them when no pattern is given
    pub async fn find_block_hashes(&self, from: u64, to: u64, patterns: &[String]) -> Result<BTreeMap<u64, String>> {
        let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
        let filter = (!patterns.is_empty()).then_some(patterns.as_slice());

        let hashes = self.cache.read().await.hashes_in_range(from, to, filter)?;
        Ok(hashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::block_store::InMemoryBlockHashRepository;
    use crate::test_support::{block_hash, FakeNode};

    fn service(node: Arc<FakeNode>) -> (BlockCacheService, Arc<InMemoryBlockHashRepository>) {
        let repository = Arc::new(InMemoryBlockHashRepository::new());
        (BlockCacheService::new(node, repository.clone(), 4), repository)
    }

    #[tokio::test]
    async fn test_sync_fetches_missing_heights() {
        let node = Arc::new(FakeNode::with_block_count(25));
        let (service, repository) = service(node.clone());

        let report = service.sync().await.unwrap();
        assert_eq!(report.fetched, 25);
        assert_eq!(report.max_height, Some(24));
        assert_eq!(service.read().await.get(7), Some(block_hash(7).as_str()));
        assert_eq!(repository.load().await.unwrap().len(), 25);

        node.set_block_count(30);
        let report = service.sync().await.unwrap();
        assert_eq!(report.fetched, 5);
    }

    #[tokio::test]
    async fn test_sync_keeps_prefix_on_failure() {
        let node = Arc::new(FakeNode::with_block_count(20));
        node.fail_block_hash_at(12);
        let (service, _) = service(node.clone());

        assert!(service.sync().await.is_err());
        assert_eq!(service.read().await.max_height(), Some(11));

        node.clear_failures();
        let report = service.sync().await.unwrap();
        assert_eq!(report.fetched, 8);
        assert_eq!(report.max_height, Some(19));
    }

    #[tokio::test]
    async fn test_load_restores_persisted_cache() {
        let node = Arc::new(FakeNode::with_block_count(10));
        let repository = Arc::new(InMemoryBlockHashRepository::new());
        BlockCacheService::new(node.clone(), repository.clone(), 2)
            .sync()
            .await
            .unwrap();

        let restarted = BlockCacheService::new(node, repository, 2);
        assert_eq!(restarted.load().await.unwrap(), 10);
        assert_eq!(restarted.sync().await.unwrap().fetched, 0);
    }

    #[tokio::test]
    async fn test_resync_starts_over() {
        let node = Arc::new(FakeNode::with_block_count(10));
        let (service, _) = service(node);
        service.sync().await.unwrap();

        let report = service.resync().await.unwrap();
        assert_eq!(report.fetched, 10);

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.count, 10);
        assert_eq!(stats.block_count, 10);
    }

    #[tokio::test]
    async fn test_pattern_lookup() {
        let node = Arc::new(FakeNode::with_block_count(50));
        let (service, _) = service(node);
        service.sync().await.unwrap();

        let all = service.find_block_hashes(10, 20, &[]).await.unwrap();
        assert_eq!(all.len(), 10);

        let pattern = block_hash(15)[8..14].to_string();
        let matching = service.find_block_hashes(10, 20, &[pattern]).await.unwrap();
        assert!(matching.contains_key(&15));

        assert!(service.find_block_hashes(40, 60, &[]).await.is_err());
    }
}
