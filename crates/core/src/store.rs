//! ChunkStore trait — lookup of document chunk text.
//!
//! Document ingestion and splitting happen upstream; the engine only reads
//! chunk text back, either a whole document in order or a specific id-set
//! resolved from search payloads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A contiguous span of a source document's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Chunk id (a UUID, shared with the vector index point id).
    pub id: String,

    /// The document this chunk belongs to.
    pub document_id: String,

    /// Position within the document.
    pub chunk_index: i64,

    /// The chunk text itself.
    pub chunk_text: String,
}

/// The chunk-text lookup collaborator.
///
/// Implementations: PostgreSQL, in-memory (for testing).
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// All chunk texts for a document, ordered by chunk index.
    ///
    /// An unknown document yields an empty vec, not an error.
    async fn chunks_for_document(
        &self,
        document_id: &str,
    ) -> std::result::Result<Vec<String>, StoreError>;

    /// Chunk texts matching the given ids within a document.
    ///
    /// Ids with no match are skipped; no matches at all yields an empty
    /// vec, not an error.
    async fn chunks_by_ids(
        &self,
        document_id: &str,
        chunk_ids: &[String],
    ) -> std::result::Result<Vec<String>, StoreError>;

    /// Remove every chunk belonging to a document.
    async fn delete_document(&self, document_id: &str) -> std::result::Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_serialization() {
        let chunk = DocumentChunk {
            id: "c1".into(),
            document_id: "d1".into(),
            chunk_index: 0,
            chunk_text: "The quick brown fox.".into(),
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert!(json.contains("quick brown fox"));
        assert!(json.contains("chunk_index"));
    }
}
