//! Bounded working context for a query session.
//!
//! `accumulator` owns the session state machine; `token` holds the
//! character-heuristic token accounting the budget is calibrated against.

pub mod accumulator;
pub mod token;

pub use accumulator::{
    CONTEXT_HISTORY_SIZE, ContextAccumulator, INITIAL_CHUNK_COUNT, MAX_INPUT_TOKENS,
};
pub use token::{CHARS_PER_TOKEN, estimate_tokens};
