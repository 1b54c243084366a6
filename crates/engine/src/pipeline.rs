//! The retrieval pipeline — the engine's upward-facing boundary.
//!
//! Orchestrates one query turn end to end: similarity retrieval, chunk
//! text resolution, context accumulation, prompt assembly, generation.
//! Thin request handlers call into this type; all policy lives here and
//! below.

use std::sync::Arc;

use tracing::{debug, info, warn};

use querydeck_core::error::{Error, Result};
use querydeck_core::{ChunkStore, Generator, RetrievedPassage};

use crate::context::accumulator::ContextAccumulator;
use crate::prompt::PromptAssembler;
use crate::retriever::VectorRetriever;

/// Orchestrates retrieval, context accumulation, and generation.
pub struct RetrievalPipeline {
    retriever: VectorRetriever,
    chunk_store: Arc<dyn ChunkStore>,
    accumulator: ContextAccumulator,
    assembler: PromptAssembler,
    generator: Arc<dyn Generator>,
}

impl RetrievalPipeline {
    pub fn new(
        retriever: VectorRetriever,
        chunk_store: Arc<dyn ChunkStore>,
        accumulator: ContextAccumulator,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            retriever,
            chunk_store,
            accumulator,
            assembler: PromptAssembler::new(),
            generator,
        }
    }

    /// Select the active document and seed its overview context.
    ///
    /// Any previous document's context is cleared unconditionally before
    /// the overview is built.
    pub async fn select_document(&self, document_id: &str) -> Result<()> {
        self.accumulator.set_active_document(document_id).await;
        self.accumulator.initialize_context(document_id).await
    }

    /// One retrieval turn: rank passages for the query and fold their
    /// chunk texts into the working context.
    ///
    /// No hits is a valid outcome: the empty vec comes back and the
    /// context is left untouched.
    pub async fn ask(&self, query_text: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        let passages = self.retriever.retrieve(query_text, top_k).await?;

        if passages.is_empty() {
            warn!(query = query_text, "no passages matched the query");
            return Ok(passages);
        }

        // Hits share the active document in this system's usage pattern;
        // the first hit's document id scopes the chunk lookup.
        let document_id = passages[0].document_id.clone();
        let chunk_ids: Vec<String> = passages.iter().map(|p| p.chunk_id.clone()).collect();
        let relevant_chunks = self.chunk_store.chunks_by_ids(&document_id, &chunk_ids).await?;
        debug!(
            document_id = %document_id,
            requested = chunk_ids.len(),
            resolved = relevant_chunks.len(),
            "resolved chunk texts for retrieval hits"
        );

        self.accumulator
            .append_to_context(query_text, &relevant_chunks)
            .await?;

        Ok(passages)
    }

    /// Assemble the prompt for a query from the current combined context.
    pub async fn generate_prompt(&self, query: &str) -> Result<String> {
        let context = self.accumulator.get_context().await;
        self.assembler.assemble(&context, query)
    }

    /// Answer a query grounded in the working context.
    ///
    /// Requires an active document. Retrieval that finds nothing is
    /// tolerated — the answer is grounded in whatever context already
    /// exists; only an empty context fails, as `NoContextAvailable` from
    /// the assembler.
    pub async fn answer(&self, query_text: &str, top_k: usize) -> Result<String> {
        if self.accumulator.active_document_id().await.is_none() {
            return Err(Error::NoContextAvailable);
        }

        self.ask(query_text, top_k).await?;

        let prompt = self.generate_prompt(query_text).await?;
        let sanitized = self.generator.sanitize_prompt(&prompt);
        let answer = self.generator.generate(&sanitized).await?;
        info!(answer_len = answer.len(), "generated grounded answer");
        Ok(answer)
    }

    /// A consistent snapshot of the combined context.
    pub async fn current_context(&self) -> String {
        self.accumulator.get_context().await
    }

    /// The currently selected document, if any.
    pub async fn active_document_id(&self) -> Option<String> {
        self.accumulator.active_document_id().await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        RecordingGenerator, ScriptedSummarizer, StaticEmbedder, StaticIndex, scored_point,
    };
    use querydeck_core::DocumentChunk;
    use querydeck_store::InMemoryChunkStore;

    struct Fixture {
        pipeline: RetrievalPipeline,
        summarizer: Arc<ScriptedSummarizer>,
        generator: Arc<RecordingGenerator>,
    }

    async fn fixture(
        hits: Vec<querydeck_core::ScoredPoint>,
        summaries: Vec<String>,
    ) -> Fixture {
        let store = Arc::new(InMemoryChunkStore::new());
        for (i, id) in ["c1", "c2"].iter().enumerate() {
            store
                .insert(DocumentChunk {
                    id: (*id).to_string(),
                    document_id: "d1".into(),
                    chunk_index: i as i64,
                    chunk_text: format!("text of {id}"),
                })
                .await;
        }

        let summarizer = Arc::new(
            ScriptedSummarizer::with_summaries(summaries).with_overview("Doc overview."),
        );
        let generator = Arc::new(RecordingGenerator::answering("The grounded answer."));

        let retriever = VectorRetriever::new(
            Arc::new(StaticEmbedder::of(vec![1.0, 0.0])),
            Arc::new(StaticIndex::of(hits)),
            "documents",
        );
        let accumulator = ContextAccumulator::new(summarizer.clone(), store.clone());

        Fixture {
            pipeline: RetrievalPipeline::new(retriever, store, accumulator, generator.clone()),
            summarizer,
            generator,
        }
    }

    #[tokio::test]
    async fn select_then_ask_then_answer() {
        let fx = fixture(
            vec![
                scored_point("c1", 0.9, "d1", "c1", 0),
                scored_point("c2", 0.8, "d1", "c2", 1),
            ],
            vec!["paris facts".into(), "more paris facts".into()],
        )
        .await;

        fx.pipeline.select_document("d1").await.unwrap();
        assert_eq!(fx.pipeline.current_context().await, "Doc overview.");

        let passages = fx.pipeline.ask("capital of france", 5).await.unwrap();
        assert_eq!(passages.len(), 2);
        assert!(fx.pipeline.current_context().await.contains("paris facts"));
        // Chunk texts were resolved from the store before summarization.
        assert_eq!(
            fx.summarizer.last_summarize_chunks(),
            vec!["text of c1".to_string(), "text of c2".to_string()]
        );

        let answer = fx.pipeline.answer("capital of france", 5).await.unwrap();
        assert_eq!(answer, "The grounded answer.");

        let prompt = fx.generator.last_prompt().unwrap();
        assert!(prompt.contains("<|context|>"));
        assert!(prompt.contains("capital of france"));
    }

    #[tokio::test]
    async fn empty_retrieval_leaves_context_untouched() {
        let fx = fixture(vec![], vec![]).await;
        fx.pipeline.select_document("d1").await.unwrap();

        let before = fx.pipeline.current_context().await;
        let passages = fx.pipeline.ask("nothing matches this", 5).await.unwrap();
        assert!(passages.is_empty());
        assert_eq!(fx.pipeline.current_context().await, before);
    }

    #[tokio::test]
    async fn answer_without_active_document_fails() {
        let fx = fixture(vec![], vec![]).await;
        let err = fx.pipeline.answer("anything", 5).await.unwrap_err();
        assert!(matches!(err, Error::NoContextAvailable));
    }

    #[tokio::test]
    async fn answer_tolerates_empty_retrieval_with_existing_context() {
        let fx = fixture(vec![], vec![]).await;
        fx.pipeline.select_document("d1").await.unwrap();

        let answer = fx.pipeline.answer("anything", 5).await.unwrap();
        assert_eq!(answer, "The grounded answer.");
        let prompt = fx.generator.last_prompt().unwrap();
        assert!(prompt.contains("Doc overview"));
    }

    #[tokio::test]
    async fn invalid_query_propagates_from_retriever() {
        let fx = fixture(vec![], vec![]).await;
        let err = fx.pipeline.ask("", 5).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
