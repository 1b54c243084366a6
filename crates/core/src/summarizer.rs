//! Summarizer trait — condenses passages into context entries.
//!
//! Two modes: a query-focused summary of retrieved chunks (one per query
//! turn), and an initial document overview built from the first chunks
//! when a document is selected.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SummarizationError;

/// A condensed, query-focused summary for one query turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSummary {
    /// The main query-focused summary text.
    pub summary: String,

    /// The chunks used for the summary, ranked by relevance.
    #[serde(default)]
    pub ranked_chunks: Vec<String>,

    /// Relevance scores matching `ranked_chunks`.
    #[serde(default)]
    pub chunk_scores: Vec<f32>,
}

/// A document overview produced from its leading chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOverview {
    /// The overview text.
    pub overview_summary: String,

    /// Key topics identified in the document.
    #[serde(default)]
    pub key_topics: Vec<String>,

    /// The representative chunks the overview was built from.
    #[serde(default)]
    pub selected_chunks: Vec<String>,
}

/// The summarization collaborator.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Condense `(query, chunks)` into one context entry.
    async fn summarize(
        &self,
        query: &str,
        chunks: &[String],
    ) -> std::result::Result<ContextSummary, SummarizationError>;

    /// Produce a document overview from its leading chunks.
    async fn summarize_overview(
        &self,
        initial_chunks: &[String],
    ) -> std::result::Result<DocumentOverview, SummarizationError>;
}
