//! In-memory backend — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use tokio::sync::RwLock;

use querydeck_core::error::StoreError;
use querydeck_core::store::{ChunkStore, DocumentChunk};

/// An in-memory chunk store backed by a Vec.
/// Useful for testing and deployments where persistence isn't needed.
pub struct InMemoryChunkStore {
    chunks: RwLock<Vec<DocumentChunk>>,
}

impl InMemoryChunkStore {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Insert one chunk.
    pub async fn insert(&self, chunk: DocumentChunk) {
        self.chunks.write().await.push(chunk);
    }

    /// Total number of stored chunks.
    pub async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.chunks.read().await.is_empty()
    }
}

impl Default for InMemoryChunkStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<String>, StoreError> {
        let chunks = self.chunks.read().await;
        let mut matching: Vec<&DocumentChunk> = chunks
            .iter()
            .filter(|c| c.document_id == document_id)
            .collect();
        matching.sort_by_key(|c| c.chunk_index);
        Ok(matching.into_iter().map(|c| c.chunk_text.clone()).collect())
    }

    async fn chunks_by_ids(
        &self,
        document_id: &str,
        chunk_ids: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let chunks = self.chunks.read().await;
        Ok(chunk_ids
            .iter()
            .filter_map(|id| {
                chunks
                    .iter()
                    .find(|c| c.document_id == document_id && c.id == *id)
                    .map(|c| c.chunk_text.clone())
            })
            .collect())
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), StoreError> {
        self.chunks
            .write()
            .await
            .retain(|c| c.document_id != document_id);
        Ok(())
    }
}
