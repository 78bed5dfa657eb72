//! Block store factory - picks the storage behind the block hash cache

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{BlockHashRepositoryPort, RepositoryError};
use crate::infrastructure::block_store::{InMemoryBlockHashRepository, SqliteBlockHashRepository};

/// Runtime choice of block hash storage
pub enum BlockStoreBackend {
    Memory(InMemoryBlockHashRepository),
    Sqlite(SqliteBlockHashRepository),
}

#[async_trait]
impl BlockHashRepositoryPort for BlockStoreBackend {
    async fn load(&self) -> Result<Vec<(u64, String)>, RepositoryError> {
        match self {
            BlockStoreBackend::Memory(r) => r.load().await,
            BlockStoreBackend::Sqlite(r) => r.load().await,
        }
    }

    async fn append(&self, entries: &[(u64, String)]) -> Result<(), RepositoryError> {
        match self {
            BlockStoreBackend::Memory(r) => r.append(entries).await,
            BlockStoreBackend::Sqlite(r) => r.append(entries).await,
        }
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        match self {
            BlockStoreBackend::Memory(r) => r.clear().await,
            BlockStoreBackend::Sqlite(r) => r.clear().await,
        }
    }
}

impl BlockStoreBackend {
    /// Open the store named by `database_url`; `memory` keeps hashes in
    /// process only
    pub async fn connect(database_url: &str) -> Result<Arc<Self>> {
        if database_url == "memory" {
            tracing::info!("Using in-memory block cache store");
            return Ok(Arc::new(BlockStoreBackend::Memory(InMemoryBlockHashRepository::new())));
        }
        if !database_url.starts_with("sqlite:") {
            anyhow::bail!("Unsupported block store: {}", database_url);
        }

        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to SQLite block cache database")?;
        tracing::info!("Connected to SQLite block cache database: {}", database_url);

        let repository = SqliteBlockHashRepository::new(pool)
            .await
            .context("Failed to prepare block_hashes table")?;
        Ok(Arc::new(BlockStoreBackend::Sqlite(repository)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_backend_is_rejected() {
        assert!(BlockStoreBackend::connect("redis://localhost").await.is_err());
    }

    #[tokio::test]
    async fn test_memory_backend_delegates() {
        let store = BlockStoreBackend::connect("memory").await.unwrap();
        store.append(&[(0, "aa".to_string())]).await.unwrap();

        assert_eq!(store.load().await.unwrap(), vec![(0, "aa".to_string())]);
    }
}
