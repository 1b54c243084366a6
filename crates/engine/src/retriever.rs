//! Vector retrieval — query text to ranked passages.
//!
//! Stateless: embeds the query via the external embedder and runs a top-K
//! similarity search against the configured collection. An empty result
//! set is a valid terminal state the caller must handle, distinct from a
//! search failure. Retries, if any, belong to the client adapters.

use std::sync::Arc;

use tracing::{debug, info, warn};

use querydeck_core::error::{Error, Result};
use querydeck_core::{Embedder, RetrievedPassage, VectorIndex};

/// Converts a query to an embedding and ranks passages by similarity.
pub struct VectorRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    collection: String,
}

impl VectorRetriever {
    /// Create a retriever scoped to one collection.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            embedder,
            index,
            collection: collection.into(),
        }
    }

    /// The collection this retriever searches.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Top-K retrieval for a query, ordered by score descending.
    ///
    /// Fails with `InvalidArgument` on a blank query or a zero `top_k`;
    /// embedder or index failures surface as their typed errors. No hits
    /// is `Ok(vec![])`.
    pub async fn retrieve(&self, query_text: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        if query_text.trim().is_empty() {
            return Err(Error::InvalidArgument("query text cannot be empty".into()));
        }
        if top_k == 0 {
            return Err(Error::InvalidArgument("top_k must be greater than 0".into()));
        }

        let query_vector = self.embedder.embed(query_text).await?;
        debug!(
            collection = %self.collection,
            dimension = query_vector.len(),
            top_k,
            "querying vector index"
        );

        let hits = self
            .index
            .search(&self.collection, &query_vector, top_k)
            .await?;

        if hits.is_empty() {
            warn!(collection = %self.collection, "no results found for the given query");
        } else {
            info!(count = hits.len(), "retrieved similarity hits");
        }

        Ok(hits
            .into_iter()
            .map(|point| RetrievedPassage {
                id: point.id,
                document_id: point.payload.doc_id,
                chunk_id: point.payload.chunk_id,
                chunk_index: point.payload.chunk_index,
                score: point.score,
                vector: point.vector,
            })
            .collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
