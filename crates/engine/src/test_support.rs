//! Scripted collaborator doubles shared across engine tests.
//!
//! Each double either replays a queue of scripted responses or returns a
//! fixed value, and records what it was called with so tests can assert
//! on the data that crossed the boundary.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use querydeck_core::error::{EmbeddingError, GenerationError, IndexError, SummarizationError};
use querydeck_core::{
    ContextSummary, DocumentOverview, Embedder, Generator, IndexPoint, PointPayload, ScoredPoint,
    Summarizer, VectorIndex,
};

/// A summarizer that replays scripted summaries in order.
///
/// Panics when more summaries are requested than were scripted.
pub struct ScriptedSummarizer {
    responses: Mutex<VecDeque<Result<ContextSummary, SummarizationError>>>,
    overview: Option<String>,
    last_summarize_chunks: Mutex<Vec<String>>,
    last_overview_chunks: Mutex<usize>,
}

impl ScriptedSummarizer {
    pub fn with_summaries(texts: Vec<String>) -> Self {
        let responses = texts
            .into_iter()
            .map(|text| {
                Ok(ContextSummary {
                    summary: text,
                    ranked_chunks: vec![],
                    chunk_scores: vec![],
                })
            })
            .collect();
        Self {
            responses: Mutex::new(responses),
            overview: None,
            last_summarize_chunks: Mutex::new(vec![]),
            last_overview_chunks: Mutex::new(0),
        }
    }

    pub fn with_overview(mut self, overview: &str) -> Self {
        self.overview = Some(overview.to_string());
        self
    }

    /// Append a scripted failure to the response queue.
    pub fn push_failure(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(SummarizationError::Unavailable(reason.to_string())));
    }

    /// The chunks passed to the most recent `summarize` call.
    pub fn last_summarize_chunks(&self) -> Vec<String> {
        self.last_summarize_chunks.lock().unwrap().clone()
    }

    /// How many chunks the most recent `summarize_overview` call received.
    pub fn last_overview_chunk_count(&self) -> usize {
        *self.last_overview_chunks.lock().unwrap()
    }
}

#[async_trait]
impl Summarizer for ScriptedSummarizer {
    async fn summarize(
        &self,
        _query: &str,
        chunks: &[String],
    ) -> Result<ContextSummary, SummarizationError> {
        *self.last_summarize_chunks.lock().unwrap() = chunks.to_vec();
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedSummarizer: no more scripted responses")
    }

    async fn summarize_overview(
        &self,
        initial_chunks: &[String],
    ) -> Result<DocumentOverview, SummarizationError> {
        *self.last_overview_chunks.lock().unwrap() = initial_chunks.len();
        Ok(DocumentOverview {
            overview_summary: self
                .overview
                .clone()
                .unwrap_or_else(|| format!("overview of {} chunks", initial_chunks.len())),
            key_topics: vec![],
            selected_chunks: vec![],
        })
    }
}

/// An embedder that returns one fixed vector for every input.
pub struct StaticEmbedder {
    vector: Vec<f32>,
}

impl StaticEmbedder {
    pub fn of(vector: Vec<f32>) -> Self {
        Self { vector }
    }
}

#[async_trait]
impl Embedder for StaticEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vector.clone())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| self.vector.clone()).collect())
    }
}

/// An embedder whose service is always down.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Unavailable("embedding service down".into()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Unavailable("embedding service down".into()))
    }
}

/// A vector index that returns a fixed hit list for every search.
pub struct StaticIndex {
    hits: Vec<ScoredPoint>,
}

impl StaticIndex {
    pub fn of(hits: Vec<ScoredPoint>) -> Self {
        Self { hits }
    }
}

#[async_trait]
impl VectorIndex for StaticIndex {
    async fn ensure_collection(
        &self,
        _collection: &str,
        _dimension: usize,
    ) -> Result<(), IndexError> {
        Ok(())
    }

    async fn upsert(&self, _collection: &str, _points: Vec<IndexPoint>) -> Result<(), IndexError> {
        Ok(())
    }

    async fn search(
        &self,
        _collection: &str,
        _query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredPoint>, IndexError> {
        let mut hits = self.hits.clone();
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete_by_filter(
        &self,
        _collection: &str,
        _field: &str,
        _value: &str,
    ) -> Result<(), IndexError> {
        Ok(())
    }
}

/// A generator that records the prompt it was handed and returns a fixed
/// answer.
pub struct RecordingGenerator {
    answer: String,
    last_prompt: Mutex<Option<String>>,
}

impl RecordingGenerator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        Ok(self.answer.clone())
    }
}

/// Build a scored point with the standard payload shape.
pub fn scored_point(
    id: &str,
    score: f32,
    doc_id: &str,
    chunk_id: &str,
    chunk_index: u64,
) -> ScoredPoint {
    ScoredPoint {
        id: id.to_string(),
        score,
        payload: PointPayload {
            doc_id: doc_id.to_string(),
            chunk_id: chunk_id.to_string(),
            chunk_index,
        },
        vector: None,
    }
}
