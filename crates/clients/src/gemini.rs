//! Gemini generation client.
//!
//! Implements [`Generator`] against the Gemini `generateContent` REST
//! endpoint. Generation knobs match the reference deployment; answers are
//! extracted from the first candidate's first part.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use querydeck_core::Generator;
use querydeck_core::error::GenerationError;

/// Default Gemini endpoint.
pub const DEFAULT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-1.5-pro:generateContent";

/// Client for the Gemini generation API.
pub struct GeminiGenerator {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiGenerator {
    /// Create a generator against an explicit endpoint.
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create a generator against the default Gemini endpoint.
    pub fn with_default_url(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_API_URL)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

#[derive(Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

fn extract_text(response: GeminiResponse) -> Result<String, GenerationError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("no candidate text in response".into())
        })
}

// ── Generator ─────────────────────────────────────────────────────────────

#[async_trait]
impl Generator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 2048,
                "stopSequences": []
            }
        });

        let url = format!("{}?key={}", self.api_url, self.api_key);
        debug!(prompt_len = prompt.len(), "sending generation request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(GenerationError::RateLimited { retry_after_secs: 5 });
        }

        if status == 401 || status == 403 {
            return Err(GenerationError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "generation API returned error");
            return Err(GenerationError::Api {
                status_code: status,
                message: error_body,
            });
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Paris is the capital." } ] } }
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(response).unwrap(), "Paris is the capital.");
    }

    #[test]
    fn empty_candidates_is_malformed() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn missing_parts_is_malformed() {
        let json = r#"{"candidates":[{"content":{}}]}"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(extract_text(response).is_err());
    }
}
