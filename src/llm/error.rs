use thiserror::Error;

/// Errors returned by the LLM evaluator.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Network error, timeout, or non-success HTTP status.
    #[error("LLM provider unavailable: {reason}")]
    UpstreamUnavailable {
        /// Human-readable reason.
        reason: String,
    },

    /// The response was not a well-formed evaluation JSON object.
    #[error("malformed LLM response: {reason}")]
    MalformedResponse {
        /// Human-readable reason.
        reason: String,
    },

    /// An unexpected internal failure, e.g. building the outgoing chat
    /// request itself failed.
    #[error("internal LLM evaluator error: {reason}")]
    Internal {
        /// Human-readable reason.
        reason: String,
    },
}
