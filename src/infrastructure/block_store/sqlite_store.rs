//! SQLite block hash storage

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::application::ports::outbound::{BlockHashRepositoryPort, RepositoryError};

pub struct SqliteBlockHashRepository {
    pool: SqlitePool,
}

impl SqliteBlockHashRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS block_hashes (
                height INTEGER PRIMARY KEY,
                hash TEXT NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl BlockHashRepositoryPort for SqliteBlockHashRepository {
    async fn load(&self) -> Result<Vec<(u64, String)>, RepositoryError> {
        let rows: Vec<(i64, String)> = sqlx::query_as("SELECT height, hash FROM block_hashes ORDER BY height")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(height, hash)| (height as u64, hash))
            .collect())
    }

    async fn append(&self, entries: &[(u64, String)]) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        for (height, hash) in entries {
            sqlx::query("INSERT OR IGNORE INTO block_hashes (height, hash) VALUES (?, ?)")
                .bind(*height as i64)
                .bind(hash)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))
    }

    async fn clear(&self) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM block_hashes")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }
}
