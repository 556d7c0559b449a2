//! LLM Evaluator (§4.6): given question, model answer, user answer, and
//! keywords, returns a parsed rubric result.

mod error;
pub mod http;
mod parsing;

pub use error::LlmError;
pub use http::HttpLlmEvaluator;
pub use parsing::parse_response;

use async_trait::async_trait;

use crate::orchestrator::types::EvaluationPayload;

/// Orchestrator-facing LLM evaluation contract.
#[async_trait]
pub trait LlmEvaluator: Send + Sync {
    /// Scores `user_answer` against `question`/`model_answer`/`keywords`.
    /// Fails with [`LlmError::UpstreamUnavailable`] on network error,
    /// timeout, or an unparsable response.
    async fn evaluate(
        &self,
        question: &str,
        model_answer: &str,
        user_answer: &str,
        keywords: &[String],
    ) -> Result<EvaluationPayload, LlmError>;
}

#[async_trait]
impl LlmEvaluator for Box<dyn LlmEvaluator + Send + Sync> {
    async fn evaluate(
        &self,
        question: &str,
        model_answer: &str,
        user_answer: &str,
        keywords: &[String],
    ) -> Result<EvaluationPayload, LlmError> {
        (**self).evaluate(question, model_answer, user_answer, keywords).await
    }
}
