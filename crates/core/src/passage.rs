//! Retrieved passages — the ranked output of a similarity search.

use serde::{Deserialize, Serialize};

/// One similarity-search hit, ready for chunk-text resolution.
///
/// Produced per retrieval call; never persisted. Ordering within a result
/// set is by `score` descending (higher = more relevant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// The point id in the vector index (a chunk UUID).
    pub id: String,

    /// The document the chunk belongs to.
    pub document_id: String,

    /// The chunk id, used to resolve the chunk text from the store.
    pub chunk_id: String,

    /// Position of the chunk within its document.
    pub chunk_index: u64,

    /// Similarity score (higher = more relevant).
    pub score: f32,

    /// The stored embedding vector, passed through when the index returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_serialization_skips_missing_vector() {
        let passage = RetrievedPassage {
            id: "p1".into(),
            document_id: "doc-42".into(),
            chunk_id: "chunk-7".into(),
            chunk_index: 3,
            score: 0.87,
            vector: None,
        };
        let json = serde_json::to_string(&passage).unwrap();
        assert!(json.contains("doc-42"));
        assert!(!json.contains("vector"));
    }
}
