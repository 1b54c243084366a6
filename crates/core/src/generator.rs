//! Generator trait — the abstraction over the answer-generating LLM.

use async_trait::async_trait;

use crate::error::GenerationError;

/// The generation collaborator: maps an assembled prompt to an answer.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator (e.g., "gemini").
    fn name(&self) -> &str;

    /// Generate an answer for the given prompt.
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;

    /// Strip control characters and surrounding whitespace from a prompt
    /// before it goes over the wire. Newlines survive: the prompt template
    /// is line-oriented.
    fn sanitize_prompt(&self, prompt: &str) -> String {
        prompt
            .chars()
            .filter(|c| !c.is_control() || *c == '\n')
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullGenerator;

    #[async_trait]
    impl Generator for NullGenerator {
        fn name(&self) -> &str {
            "null"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok(String::new())
        }
    }

    #[test]
    fn sanitize_strips_control_chars() {
        let generator = NullGenerator;
        let dirty = "  hello\u{0000}\u{0007} world\u{001b} ";
        assert_eq!(generator.sanitize_prompt(dirty), "hello world");
    }

    #[test]
    fn sanitize_keeps_newlines() {
        let generator = NullGenerator;
        let prompt = "<|system|>\nanswer from context\n";
        assert_eq!(generator.sanitize_prompt(prompt), "<|system|>\nanswer from context");
    }
}
