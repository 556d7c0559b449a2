//! Errors surfaced by the [`super::Orchestrator`]'s `check_answer` operation.

use thiserror::Error;

use crate::llm::LlmError;
use crate::quiz::{QuizIdError, QuizRepositoryError};

/// Caller-visible outcome of a `check_answer` call (§7).
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The request failed input validation; no side effects occurred.
    #[error("validation error: {message}")]
    Validation {
        /// Human-readable description of the offending field(s).
        message: String,
    },

    /// The quiz identifier does not refer to a known quiz.
    #[error("quiz not found")]
    QuizNotFound,

    /// The quiz exists but has no model answers to evaluate against.
    #[error("quiz has no model answers")]
    DataIntegrity,

    /// The LLM evaluator failed (network error, timeout, or malformed response).
    #[error("upstream LLM unavailable: {reason}")]
    UpstreamUnavailable {
        /// Human-readable reason.
        reason: String,
    },

    /// An unexpected backend failure (e.g. quiz repository infra error).
    #[error("internal error: {reason}")]
    Internal {
        /// Human-readable reason.
        reason: String,
    },
}

impl From<QuizIdError> for OrchestratorError {
    fn from(err: QuizIdError) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}

impl From<QuizRepositoryError> for OrchestratorError {
    fn from(err: QuizRepositoryError) -> Self {
        Self::Internal {
            reason: err.to_string(),
        }
    }
}

impl From<LlmError> for OrchestratorError {
    fn from(err: LlmError) -> Self {
        Self::UpstreamUnavailable {
            reason: err.to_string(),
        }
    }
}

// Embedding, similarity-cache, anonymous-cache, and attempt-repository
// failures are all recovered locally per §7's propagation policy: they are
// logged and swallowed inside the orchestrator, never converted into an
// `OrchestratorError`.
