//! # QueryDeck Core
//!
//! Domain types, collaborator traits, and error definitions for the
//! QueryDeck retrieval-augmented question-answering engine. This crate has
//! **zero framework dependencies** — it defines the domain model that all
//! other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (embedder, vector index, chunk store,
//! summarizer, generator) is defined as a trait here. Implementations live
//! in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod embedder;
pub mod error;
pub mod generator;
pub mod index;
pub mod passage;
pub mod store;
pub mod summarizer;

// Re-export key types at crate root for ergonomics
pub use embedder::Embedder;
pub use error::{Error, RateWindow, Result};
pub use generator::Generator;
pub use index::{IndexPoint, PointPayload, ScoredPoint, VectorIndex};
pub use passage::RetrievedPassage;
pub use store::{ChunkStore, DocumentChunk};
pub use summarizer::{ContextSummary, DocumentOverview, Summarizer};
