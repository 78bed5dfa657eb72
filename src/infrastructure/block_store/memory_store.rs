//! In-memory block hash storage, used for tests and `memory` deployments

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{BlockHashRepositoryPort, RepositoryError};

#[derive(Default)]
pub struct InMemoryBlockHashRepository {
    entries: RwLock<BTreeMap<u64, String>>,
}

impl InMemoryBlockHashRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlockHashRepositoryPort for InMemoryBlockHashRepository {
    async fn load(&self) -> Result<Vec<(u64, String)>, RepositoryError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().map(|(h, hash)| (*h, hash.clone())).collect())
    }

    async fn append(&self, entries: &[(u64, String)]) -> Result<(), RepositoryError> {
        let mut stored = self.entries.write().await;
        for (height, hash) in entries {
            stored.entry(*height).or_insert_with(|| hash.clone());
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
