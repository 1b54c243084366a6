//! External collaborator clients for QueryDeck.
//!
//! Each client adapts one external service to a `querydeck-core` trait:
//!
//! - [`SidecarClient`] — embedding + summarization sidecar
//! - [`QdrantHttpIndex`] — Qdrant vector index over REST
//! - [`GeminiGenerator`] — Gemini answer generation
//!
//! Timeouts and error mapping live here; the engine never retries and
//! never talks HTTP itself.

pub mod gemini;
pub mod qdrant;
pub mod sidecar;

pub use gemini::GeminiGenerator;
pub use qdrant::QdrantHttpIndex;
pub use sidecar::SidecarClient;
