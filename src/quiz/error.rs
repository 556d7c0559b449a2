use thiserror::Error;

/// Errors returned by a [`super::QuizRepository`] implementation.
#[derive(Debug, Error)]
pub enum QuizRepositoryError {
    /// The backing store is unreachable or returned an unexpected failure.
    #[error("quiz repository unavailable: {reason}")]
    Unavailable {
        /// Human-readable reason.
        reason: String,
    },
}

/// Errors returned by [`super::QuizId::parse`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizIdError {
    /// The id is not a well-formed 26-character Crockford-base32 ULID.
    #[error("'{value}' is not a well-formed quiz identifier (expected a 26-character ULID)")]
    InvalidFormat {
        /// The offending input.
        value: String,
    },
}
