//! PostgreSQL chunk store backend.
//!
//! Implements [`ChunkStore`] over a `document_chunks` table via `sqlx`.
//!
//! # Setup
//!
//! Run the migration in `migrations/001_create_document_chunks.sql`, or
//! call [`PostgresChunkStore::migrate`] at startup.
//!
//! # Feature gate
//!
//! This module is behind the `postgres` feature flag:
//!
//! ```toml
//! querydeck-store = { workspace = true, features = ["postgres"] }
//! ```

use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

use querydeck_core::error::StoreError;
use querydeck_core::store::ChunkStore;

/// PostgreSQL-backed chunk store.
pub struct PostgresChunkStore {
    pool: PgPool,
}

impl PostgresChunkStore {
    /// Create a new PostgreSQL store from a connection string.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Storage(format!("PostgreSQL connection failed: {e}")))?;

        info!("Connected to PostgreSQL for chunk storage");
        Ok(Self { pool })
    }

    /// Create from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the schema migration.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let migration_sql = include_str!("../migrations/001_create_document_chunks.sql");

        sqlx::raw_sql(migration_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("Migration failed: {e}")))?;

        info!("Chunk store schema migration complete");
        Ok(())
    }
}

#[async_trait]
impl ChunkStore for PostgresChunkStore {
    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT chunk_text FROM document_chunks \
             WHERE document_id = $1 ORDER BY chunk_index",
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("chunk lookup failed: {e}")))?;

        debug!(document_id, count = rows.len(), "fetched document chunks");
        Ok(rows.iter().map(|row| row.get("chunk_text")).collect())
    }

    async fn chunks_by_ids(
        &self,
        document_id: &str,
        chunk_ids: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT chunk_text FROM document_chunks \
             WHERE document_id = $1 AND id = ANY($2) ORDER BY chunk_index",
        )
        .bind(document_id)
        .bind(chunk_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("chunk id-set lookup failed: {e}")))?;

        debug!(
            document_id,
            requested = chunk_ids.len(),
            resolved = rows.len(),
            "fetched chunks by id"
        );
        Ok(rows.iter().map(|row| row.get("chunk_text")).collect())
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM document_chunks WHERE document_id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("chunk deletion failed: {e}")))?;

        info!(document_id, "deleted document chunks");
        Ok(())
    }
}
