//! The context accumulator — the engine's stateful core.
//!
//! Holds the active document id, a bounded FIFO of condensed per-query
//! summaries, and the combined context string handed to the prompt
//! assembler. One exclusive lock guards the whole session state and is
//! held across the summarizer call: at most one context mutation is in
//! flight globally, so readers never observe a torn aggregate.
//!
//! Invariants after every mutating call:
//! - at most [`CONTEXT_HISTORY_SIZE`] history entries;
//! - the combined context fits [`MAX_INPUT_TOKENS`];
//! - the combined context is the history entries in chronological order,
//!   each followed by a newline, with the freshest entry repeated at the
//!   tail right after an append (the prompt assembler's deduplication
//!   pass collapses the repeat).

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use querydeck_core::error::Result;
use querydeck_core::{ChunkStore, Summarizer};

use crate::context::token::{CHARS_PER_TOKEN, estimate_tokens, skip_chars, tail_chars};
use crate::rate_limit::RateLimiter;

/// Maximum number of historical context entries to retain.
pub const CONTEXT_HISTORY_SIZE: usize = 5;

/// Token budget for the combined context.
pub const MAX_INPUT_TOKENS: usize = 1_048_576;

/// How many leading chunks seed the initial document overview.
pub const INITIAL_CHUNK_COUNT: usize = 6;

/// The session's working context, guarded by one exclusive lock.
pub struct ContextAccumulator {
    summarizer: Arc<dyn Summarizer>,
    chunk_store: Arc<dyn ChunkStore>,
    state: Mutex<SessionState>,
}

#[derive(Debug)]
struct SessionState {
    active_document_id: Option<String>,
    history: VecDeque<String>,
    combined_context: String,
    rate: RateLimiter,
}

impl SessionState {
    fn new() -> Self {
        Self {
            active_document_id: None,
            history: VecDeque::with_capacity(CONTEXT_HISTORY_SIZE),
            combined_context: String::new(),
            rate: RateLimiter::new(),
        }
    }
}

impl ContextAccumulator {
    /// Create an accumulator with empty session state.
    pub fn new(summarizer: Arc<dyn Summarizer>, chunk_store: Arc<dyn ChunkStore>) -> Self {
        Self {
            summarizer,
            chunk_store,
            state: Mutex::new(SessionState::new()),
        }
    }

    /// Select the active document, unconditionally clearing the history
    /// and combined context. No partial carry-over between documents.
    pub async fn set_active_document(&self, document_id: &str) {
        let mut state = self.state.lock().await;
        state.active_document_id = Some(document_id.to_string());
        state.history.clear();
        state.combined_context.clear();
        info!(document_id, "active document selected, context cleared");
    }

    /// Seed the combined context with an overview of the document's
    /// leading chunks. History is untouched.
    ///
    /// An empty document is valid: the context stays empty and the call
    /// succeeds.
    pub async fn initialize_context(&self, document_id: &str) -> Result<()> {
        let chunks = self.chunk_store.chunks_for_document(document_id).await?;
        let initial: Vec<String> = chunks.into_iter().take(INITIAL_CHUNK_COUNT).collect();

        if initial.is_empty() {
            warn!(document_id, "no initial chunks found, context stays empty");
            return Ok(());
        }

        let overview = self.summarizer.summarize_overview(&initial).await?;

        let mut state = self.state.lock().await;
        state.combined_context = overview.overview_summary;
        debug!(document_id, "context initialized from document overview");
        Ok(())
    }

    /// Fold one query turn into the bounded context.
    ///
    /// Runs entirely under the session lock: rate check, summarization,
    /// FIFO insertion, aggregate rebuild, token-budget enforcement. The
    /// rate check and the summarizer call both precede any mutation, so
    /// a rejected or failed call leaves the state byte-identical.
    pub async fn append_to_context(&self, query: &str, relevant_chunks: &[String]) -> Result<()> {
        let mut state = self.state.lock().await;

        state.rate.check_and_increment()?;

        let summary = self.summarizer.summarize(query, relevant_chunks).await?;
        let entry = summary.summary;

        if state.history.len() >= CONTEXT_HISTORY_SIZE {
            state.history.pop_front();
        }
        state.history.push_back(entry.clone());

        state.combined_context = combine_contexts(&state.history, &entry);
        enforce_token_budget(&mut state);

        debug!(
            history_len = state.history.len(),
            context_tokens = estimate_tokens(&state.combined_context),
            "context appended"
        );
        Ok(())
    }

    /// Wipe the history and combined context.
    pub async fn clear_context(&self) {
        let mut state = self.state.lock().await;
        state.history.clear();
        state.combined_context.clear();
    }

    /// A consistent snapshot of the combined context.
    pub async fn get_context(&self) -> String {
        self.state.lock().await.combined_context.clone()
    }

    /// The currently selected document, if any.
    pub async fn active_document_id(&self) -> Option<String> {
        self.state.lock().await.active_document_id.clone()
    }

    /// Number of retained history entries.
    pub async fn history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }
}

/// Every history entry followed by a newline, then the current entry.
fn combine_contexts(history: &VecDeque<String>, current: &str) -> String {
    let mut combined = String::new();
    for entry in history {
        combined.push_str(entry);
        combined.push('\n');
    }
    combined.push_str(current);
    combined
}

/// Evict or trim the oldest history entries until the aggregate fits the
/// token budget.
///
/// Converges: every iteration either shrinks the history or terminates
/// via the empty-history hard truncation.
fn enforce_token_budget(state: &mut SessionState) {
    while estimate_tokens(&state.combined_context) > MAX_INPUT_TOKENS {
        if state.history.is_empty() {
            // Nothing left to evict: keep only the freshest tail.
            warn!("context history empty, hard-truncating combined context");
            state.combined_context =
                tail_chars(&state.combined_context, MAX_INPUT_TOKENS * CHARS_PER_TOKEN).to_string();
            return;
        }

        let total_tokens = estimate_tokens(&state.combined_context);
        let Some(oldest) = state.history.pop_front() else {
            return;
        };
        let oldest_tokens = estimate_tokens(&oldest);

        // When dropping the oldest entry alone would satisfy the budget,
        // cut only the leading span that must go and keep the remainder
        // at the front of the history. Otherwise the entry is discarded
        // wholesale.
        if total_tokens.saturating_sub(oldest_tokens) < MAX_INPUT_TOKENS {
            let excess_tokens = total_tokens - MAX_INPUT_TOKENS;
            let chars_to_remove = excess_tokens.min(oldest_tokens) * CHARS_PER_TOKEN;
            let remainder = skip_chars(&oldest, chars_to_remove);
            if !remainder.trim().is_empty() {
                state.history.push_front(remainder.to_string());
            }
        }

        state.combined_context = combine_contexts(&state.history, "");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
