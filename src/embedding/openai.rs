//! OpenAI-backed [`UpstreamEmbedder`].

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::CreateEmbeddingRequestArgs;
use async_trait::async_trait;

use super::{EmbeddingError, UpstreamEmbedder};

/// Calls the OpenAI embeddings API via `async-openai`.
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiEmbedder {
    /// Builds an embedder against `endpoint` (an OpenAI-compatible base URL)
    /// using `model`. The API key is read by `async-openai` from
    /// `OPENAI_API_KEY`.
    pub fn new(endpoint: String, model: String, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client configuration is always valid");
        let config = OpenAIConfig::new().with_api_base(endpoint);
        Self {
            client: Client::with_config(config).with_http_client(http_client),
            model,
        }
    }
}

#[async_trait]
impl UpstreamEmbedder for OpenAiEmbedder {
    fn provider_name(&self) -> &'static str {
        "openai"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(text)
            .build()
            .map_err(|e| EmbeddingError::Internal {
                reason: e.to_string(),
            })?;

        let response =
            self.client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| EmbeddingError::UpstreamUnavailable {
                    reason: e.to_string(),
                })?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::UpstreamUnavailable {
                reason: "openai returned no embedding data".to_string(),
            })?
            .embedding;

        Ok(embedding)
    }
}
