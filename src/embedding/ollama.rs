//! Ollama-backed [`UpstreamEmbedder`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{EmbeddingError, UpstreamEmbedder};

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

/// Calls a self-hosted [Ollama](https://ollama.com) server's `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OllamaEmbedder {
    /// Builds an embedder against `endpoint` (the server base URL) using `model`.
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            model,
            timeout,
        }
    }
}

#[async_trait]
impl UpstreamEmbedder for OllamaEmbedder {
    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let url = format!("{}/api/embeddings", self.endpoint.trim_end_matches('/'));
        let body = EmbeddingsRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::UpstreamUnavailable {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(EmbeddingError::UpstreamUnavailable {
                reason: format!("ollama returned status {}", response.status()),
            });
        }

        let parsed: EmbeddingsResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::UpstreamUnavailable {
                    reason: format!("malformed ollama response: {e}"),
                })?;

        Ok(parsed.embedding)
    }
}
