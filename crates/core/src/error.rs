//! Error types for the QueryDeck domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error variant; the engine's own
//! policy rejections (rate limits, missing context, bad arguments) are
//! top-level variants because no collaborator is involved.

use thiserror::Error;

/// The top-level error type for all QueryDeck operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Caller faults (no state change) ---
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // --- Policy rejections (no state change) ---
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(RateWindow),

    #[error("No context available for generating the prompt")]
    NoContextAvailable,

    // --- Collaborator failures ---
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Vector index error: {0}")]
    Index(#[from] IndexError),

    #[error("Summarization error: {0}")]
    Summarization(#[from] SummarizationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Chunk store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Which rate window was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateWindow {
    PerMinute,
    PerDay,
}

impl std::fmt::Display for RateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateWindow::PerMinute => write!(f, "too many requests per minute"),
            RateWindow::PerDay => write!(f, "too many requests today"),
        }
    }
}

// --- Collaborator boundary errors ---

#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    #[error("Embedding service unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Vector index unavailable: {0}")]
    Unavailable(String),

    #[error("Index request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Collection not found: {0}")]
    CollectionMissing(String),

    #[error("Malformed index response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum SummarizationError {
    #[error("Summarization service unavailable: {0}")]
    Unavailable(String),

    #[error("Summarization request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Malformed summarization response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Generation service unavailable: {0}")]
    Unavailable(String),

    #[error("Generation request failed: {message} (status: {status_code})")]
    Api { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}
