//! Chunk store backends for QueryDeck.
//!
//! Ingestion writes chunks elsewhere; these backends only implement the
//! narrow read/delete contract the engine consumes.

pub mod in_memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryChunkStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresChunkStore;
