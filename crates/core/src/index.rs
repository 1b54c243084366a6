//! VectorIndex trait — the abstraction over the nearest-neighbor store.
//!
//! The engine only needs four operations: idempotent collection creation,
//! batch upsert, top-K query, and delete-by-filter. Payload fields carried
//! with every point (`docId`, `chunkId`, `chunkIndex`) are a wire contract:
//! the retrieval pipeline resolves chunk text from them after a search.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// Metadata stored alongside each vector point.
///
/// Field names are fixed by the index payload schema; do not rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPayload {
    #[serde(rename = "docId")]
    pub doc_id: String,

    #[serde(rename = "chunkId")]
    pub chunk_id: String,

    #[serde(rename = "chunkIndex")]
    pub chunk_index: u64,
}

/// One point to upsert into a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexPoint {
    /// Point id (a chunk UUID).
    pub id: String,

    /// The embedding vector.
    pub vector: Vec<f32>,

    /// Payload metadata.
    pub payload: PointPayload,
}

/// One scored hit from a similarity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub id: String,

    /// Similarity score (higher = more relevant).
    pub score: f32,

    pub payload: PointPayload,

    /// The stored vector, when the query requested it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

/// The nearest-neighbor search collaborator.
///
/// Implementations: Qdrant over REST, in-memory fakes for tests.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection if it does not exist. Idempotent.
    async fn ensure_collection(
        &self,
        collection: &str,
        dimension: usize,
    ) -> std::result::Result<(), IndexError>;

    /// Batch-upsert points into a collection.
    async fn upsert(
        &self,
        collection: &str,
        points: Vec<IndexPoint>,
    ) -> std::result::Result<(), IndexError>;

    /// Top-K similarity search, ordered by score descending.
    ///
    /// An empty result set is a valid outcome, not an error.
    async fn search(
        &self,
        collection: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> std::result::Result<Vec<ScoredPoint>, IndexError>;

    /// Delete every point whose payload `field` matches `value` exactly.
    async fn delete_by_filter(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> std::result::Result<(), IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_wire_field_names() {
        let payload = PointPayload {
            doc_id: "d1".into(),
            chunk_id: "c1".into(),
            chunk_index: 0,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"docId\""));
        assert!(json.contains("\"chunkId\""));
        assert!(json.contains("\"chunkIndex\""));
    }

    #[test]
    fn scored_point_roundtrip() {
        let json = r#"{"id":"p1","score":0.9,"payload":{"docId":"d","chunkId":"c","chunkIndex":2}}"#;
        let point: ScoredPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.payload.chunk_index, 2);
        assert!(point.vector.is_none());
    }
}
