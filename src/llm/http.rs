//! HTTP-backed LLM Evaluator (§4.6).

use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use serde_json::json;

use super::error::LlmError;
use super::parsing::parse_response;
use super::LlmEvaluator;
use crate::orchestrator::types::EvaluationPayload;

const TEMPERATURE: f32 = 0.1;

/// Calls an OpenAI-chat-compatible endpoint and parses the evaluation out
/// of the model's completion.
pub struct HttpLlmEvaluator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl HttpLlmEvaluator {
    /// Builds an evaluator posting to `endpoint` using `model`. The API key
    /// is read by `async-openai` from `OPENAI_API_KEY`.
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

    fn build_prompt(question: &str, model_answer: &str, user_answer: &str, keywords: &[String]) -> String {
        format!(
            "You are grading a short-answer quiz response. Return ONLY a JSON object \
             with fields {{score, explanation, keyword_matches, completeness, relevance, accuracy}}. \
             Scores are floats in [0, 1]. explanation must be at most 100 words. \
             keyword_matches must be a subset of the provided keywords.\n\n\
             Question: {question}\n\
             Model answer: {model_answer}\n\
             User answer: {user_answer}\n\
             Keywords: {}",
            json!(keywords)
        )
    }

    async fn call_chat(&self, prompt: String) -> Result<String, LlmError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::Internal {
                reason: e.to_string(),
            })?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message.into()])
            .temperature(TEMPERATURE)
            .build()
            .map_err(|e| LlmError::Internal {
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| LlmError::UpstreamUnavailable {
                reason: e.to_string(),
            })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::UpstreamUnavailable {
                reason: "chat-completion response missing choices[0].message.content".to_string(),
            })
    }
}

#[async_trait]
impl LlmEvaluator for HttpLlmEvaluator {
    async fn evaluate(
        &self,
        question: &str,
        model_answer: &str,
        user_answer: &str,
        keywords: &[String],
    ) -> Result<EvaluationPayload, LlmError> {
        let prompt = Self::build_prompt(question, model_answer, user_answer, keywords);
        let raw = self.call_chat(prompt).await?;
        parse_response(&raw, keywords)
    }
}
