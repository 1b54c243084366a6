//! Embedder trait — maps text to dense vectors.
//!
//! The embedding model itself is an external service; the engine only
//! consumes this narrow contract. No retry policy lives here — retries,
//! if any, belong to the client adapter.

use async_trait::async_trait;

use crate::error::EmbeddingError;

/// The embedding collaborator.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts. The result has the same length and order
    /// as the input.
    async fn embed_batch(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, EmbeddingError>;
}
