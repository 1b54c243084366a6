//! HTTP client for the embedding/summarization sidecar service.
//!
//! The sidecar hosts the embedding model and the summarization model
//! behind three endpoints:
//!
//! - `POST /generate-embeddings` — texts to vectors
//! - `POST /summarize`           — query-focused chunk summary
//! - `POST /initial-summary`     — document overview from leading chunks
//!
//! One client implements both the [`Embedder`] and [`Summarizer`]
//! contracts. Timeouts live here; the engine imposes none of its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use querydeck_core::error::{EmbeddingError, SummarizationError};
use querydeck_core::{ContextSummary, DocumentOverview, Embedder, Summarizer};

/// Token cap passed to the summarization model.
const SUMMARY_MAX_TOKENS: u32 = 1_024;
/// How many ranked chunks feed a query-focused summary.
const SUMMARY_TOP_K: u32 = 5;
/// How many representative chunks feed a document overview.
const OVERVIEW_CHUNK_COUNT: u32 = 5;

/// Client for the embedding/summarization sidecar.
pub struct SidecarClient {
    base_url: String,
    client: reqwest::Client,
}

impl SidecarClient {
    /// Create a new sidecar client.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingApiRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingApiResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct SummarizeApiRequest<'a> {
    query: &'a str,
    chunks: &'a [String],
    max_tokens: u32,
    top_k: u32,
}

#[derive(Deserialize)]
struct SummarizeApiResponse {
    summary: String,
    #[serde(default)]
    ranked_chunks: Vec<String>,
    #[serde(default)]
    chunk_scores: Vec<f32>,
}

#[derive(Serialize)]
struct InitialSummaryApiRequest<'a> {
    chunks: &'a [String],
    max_tokens: u32,
    chunk_count: u32,
}

#[derive(Deserialize)]
struct InitialSummaryApiResponse {
    overview_summary: String,
    #[serde(default)]
    key_topics: Vec<String>,
    #[serde(default)]
    selected_chunks: Vec<String>,
}

// ── Embedder ──────────────────────────────────────────────────────────────

#[async_trait]
impl Embedder for SidecarClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings.pop().ok_or_else(|| {
            EmbeddingError::MalformedResponse("no embedding returned for query text".into())
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let url = format!("{}/generate-embeddings", self.base_url);
        debug!(count = texts.len(), "requesting embeddings");

        let response = self
            .client
            .post(&url)
            .json(&EmbeddingApiRequest { texts })
            .send()
            .await
            .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "embedding service returned error");
            return Err(EmbeddingError::Api {
                status_code: status,
                message: body,
            });
        }

        let parsed: EmbeddingApiResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        if parsed.embeddings.len() != texts.len() {
            return Err(EmbeddingError::MalformedResponse(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.embeddings.len()
            )));
        }
        Ok(parsed.embeddings)
    }
}

// ── Summarizer ────────────────────────────────────────────────────────────

#[async_trait]
impl Summarizer for SidecarClient {
    async fn summarize(
        &self,
        query: &str,
        chunks: &[String],
    ) -> Result<ContextSummary, SummarizationError> {
        let url = format!("{}/summarize", self.base_url);
        debug!(query, chunks = chunks.len(), "requesting query-focused summary");

        let response = self
            .client
            .post(&url)
            .json(&SummarizeApiRequest {
                query,
                chunks,
                max_tokens: SUMMARY_MAX_TOKENS,
                top_k: SUMMARY_TOP_K,
            })
            .send()
            .await
            .map_err(|e| SummarizationError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "summarization service returned error");
            return Err(SummarizationError::Api {
                status_code: status,
                message: body,
            });
        }

        let parsed: SummarizeApiResponse = response
            .json()
            .await
            .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

        Ok(ContextSummary {
            summary: parsed.summary,
            ranked_chunks: parsed.ranked_chunks,
            chunk_scores: parsed.chunk_scores,
        })
    }

    async fn summarize_overview(
        &self,
        initial_chunks: &[String],
    ) -> Result<DocumentOverview, SummarizationError> {
        let url = format!("{}/initial-summary", self.base_url);
        debug!(chunks = initial_chunks.len(), "requesting document overview");

        let response = self
            .client
            .post(&url)
            .json(&InitialSummaryApiRequest {
                chunks: initial_chunks,
                max_tokens: SUMMARY_MAX_TOKENS,
                chunk_count: OVERVIEW_CHUNK_COUNT,
            })
            .send()
            .await
            .map_err(|e| SummarizationError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "overview service returned error");
            return Err(SummarizationError::Api {
                status_code: status,
                message: body,
            });
        }

        let parsed: InitialSummaryApiResponse = response
            .json()
            .await
            .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

        Ok(DocumentOverview {
            overview_summary: parsed.overview_summary,
            key_topics: parsed.key_topics,
            selected_chunks: parsed.selected_chunks,
        })
    }
}
