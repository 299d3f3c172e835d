use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::GeminiConfig;
use crate::errors::{AppError, Result};

/// Client for the Gemini text-generation REST API.
///
/// One `generateContent` request per call, no streaming. Shared across
/// requests; read-only after construction.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_base: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout,
        }
    }

    /// Generate an answer for a single prompt string.
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Backend(format!("Gemini request timed out: {}", e))
                } else {
                    AppError::Backend(format!("Gemini request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(format!(
                "Gemini API failed with status {}: {}",
                status, error_text
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Backend(format!("Failed to parse Gemini response: {}", e)))?;

        let text = generated
            .candidates
            .and_then(|mut candidates| candidates.pop())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .ok_or_else(|| {
                AppError::Backend("Gemini returned no text in the response candidates".to_string())
            })?;

        debug!(answer_chars = text.len(), "Received generated answer");

        Ok(text)
    }
}

#[async_trait::async_trait]
impl crate::pipeline::AnswerBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        GeminiClient::generate(self, prompt).await
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_extraction_shape() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "grounded answer"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let text = parsed
            .candidates
            .and_then(|mut c| c.pop())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text));
        assert_eq!(text.as_deref(), Some("grounded answer"));
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        let text = parsed
            .candidates
            .and_then(|mut c| c.pop())
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text));
        assert!(text.is_none());
    }
}
