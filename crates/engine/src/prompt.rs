//! Prompt assembly — deduplicated context plus the live query, rendered
//! into the fixed four-section template the generator expects.
//!
//! The section markers and their order are a wire contract consumed by
//! the generation collaborator; changing them breaks answer quality for
//! models tuned on this layout.

use tracing::debug;

use querydeck_core::error::{Error, Result};

/// Formats the combined context and query into a model-ready prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the prompt for one query.
    ///
    /// Fails with `NoContextAvailable` when the combined context is empty;
    /// grounded answering needs something to ground in.
    pub fn assemble(&self, combined_context: &str, query: &str) -> Result<String> {
        if combined_context.is_empty() {
            return Err(Error::NoContextAvailable);
        }

        let context = dedupe_context(combined_context);
        debug!(
            raw_len = combined_context.len(),
            deduped_len = context.len(),
            "assembled prompt context"
        );

        Ok(format!(
            "<|system|>\n\
             You are a helpful AI assistant. Provide clear and accurate answers based only on the given context.\n\
             \n\
             <|context|>\n\
             {context}\n\
             \n\
             <|user|>\n\
             {query}\n\
             \n\
             <|assistant|>\n\
             Let me help you with that based on the provided context.\n"
        ))
    }
}

/// Split on `". "`, keep the first occurrence of each segment (order
/// preserved), drop whitespace-only segments, rejoin and close with a
/// single period.
fn dedupe_context(context: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for segment in context.split(". ") {
        if segment.trim().is_empty() {
            continue;
        }
        if !seen.contains(&segment) {
            seen.push(segment);
        }
    }

    let mut deduped = seen.join(". ");
    if !deduped.ends_with('.') {
        deduped.push('.');
    }
    deduped
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_fails() {
        let assembler = PromptAssembler::new();
        let err = assembler.assemble("", "q").unwrap_err();
        assert!(matches!(err, Error::NoContextAvailable));
    }

    #[test]
    fn repeated_sentences_are_deduplicated() {
        let context = "Paris is the capital. Paris is the capital. It has 2M people.";
        assert_eq!(
            dedupe_context(context),
            "Paris is the capital. It has 2M people."
        );
    }

    #[test]
    fn dedupe_is_idempotent() {
        let context = "Paris is the capital. Paris is the capital. It has 2M people.";
        let once = dedupe_context(context);
        let twice = dedupe_context(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn whitespace_segments_are_dropped() {
        let context = "First fact.    . Second fact.";
        assert_eq!(dedupe_context(context), "First fact. Second fact.");
    }

    #[test]
    fn unterminated_context_gains_a_period() {
        assert_eq!(dedupe_context("just one clause"), "just one clause.");
    }

    #[test]
    fn template_sections_appear_in_order() {
        let assembler = PromptAssembler::new();
        let prompt = assembler
            .assemble("The sky is blue. Water is wet.", "why is the sky blue?")
            .unwrap();

        let system = prompt.find("<|system|>").unwrap();
        let context = prompt.find("<|context|>").unwrap();
        let user = prompt.find("<|user|>").unwrap();
        let assistant = prompt.find("<|assistant|>").unwrap();
        assert!(system < context && context < user && user < assistant);

        assert!(prompt.contains("based only on the given context"));
        assert!(prompt.contains("The sky is blue. Water is wet."));
        assert!(prompt.contains("why is the sky blue?"));
        assert!(prompt.ends_with("Let me help you with that based on the provided context.\n"));
    }

    #[test]
    fn assembled_context_is_deduplicated() {
        let assembler = PromptAssembler::new();
        let prompt = assembler
            .assemble("Fact one. Fact one. Fact two.", "q")
            .unwrap();
        assert_eq!(prompt.matches("Fact one").count(), 1);
    }
}
