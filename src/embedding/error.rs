use thiserror::Error;

use crate::singleflight::LeaderCancelled;

/// Errors returned by the embedding provider adapter.
#[derive(Debug, Error, Clone)]
pub enum EmbeddingError {
    /// The input text was empty or otherwise not embeddable.
    #[error("invalid embedding input: {reason}")]
    InvalidInput {
        /// Human-readable reason.
        reason: String,
    },

    /// The upstream provider returned an error, timed out, or is unreachable.
    #[error("embedding provider unavailable: {reason}")]
    UpstreamUnavailable {
        /// Human-readable reason.
        reason: String,
    },

    /// An unexpected internal failure (cache corruption surfaced past its
    /// recovery point, codec bug, etc).
    #[error("internal embedding error: {reason}")]
    Internal {
        /// Human-readable reason.
        reason: String,
    },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingError::UpstreamUnavailable {
            reason: err.to_string(),
        }
    }
}

impl From<LeaderCancelled> for EmbeddingError {
    fn from(_: LeaderCancelled) -> Self {
        EmbeddingError::Internal {
            reason: "single-flight leader was cancelled before completing".to_string(),
        }
    }
}
