//! Block hash repository port - Durable storage behind the block hash cache

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Append-only height to hash storage.
///
/// Implementations never overwrite a stored height.
#[async_trait]
pub trait BlockHashRepositoryPort: Send + Sync {
    /// Load every stored entry
    async fn load(&self) -> Result<Vec<(u64, String)>, RepositoryError>;

    /// Store new entries, ignoring heights that are already present
    async fn append(&self, entries: &[(u64, String)]) -> Result<(), RepositoryError>;

    /// Drop everything
    async fn clear(&self) -> Result<(), RepositoryError>;
}
