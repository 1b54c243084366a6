//! # QueryDeck Engine
//!
//! The context & retrieval assembly core: nearest-neighbor retrieval of
//! relevant passages, a bounded working context maintained across a query
//! sequence under a hard token budget, request-rate limits protecting the
//! generation quota, and deduplicated prompt assembly.
//!
//! The engine holds the only real state in the system — one session's
//! working context behind one exclusive lock — and consumes narrow
//! collaborator contracts (`Embedder`, `VectorIndex`, `ChunkStore`,
//! `Summarizer`, `Generator`) defined in `querydeck-core`.

pub mod context;
pub mod pipeline;
pub mod prompt;
pub mod rate_limit;
pub mod retriever;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::accumulator::{
    CONTEXT_HISTORY_SIZE, ContextAccumulator, INITIAL_CHUNK_COUNT, MAX_INPUT_TOKENS,
};
pub use context::token::{CHARS_PER_TOKEN, estimate_tokens};
pub use pipeline::RetrievalPipeline;
pub use prompt::PromptAssembler;
pub use rate_limit::{RateLimiter, REQUESTS_PER_DAY, REQUESTS_PER_MINUTE};
pub use retriever::VectorRetriever;
