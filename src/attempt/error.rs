use thiserror::Error;

/// Errors returned by an [`super::AttemptRepository`] implementation.
#[derive(Debug, Error)]
pub enum AttemptRepositoryError {
    /// The backing store is unreachable or returned an unexpected failure.
    #[error("attempt repository unavailable: {reason}")]
    Unavailable {
        /// Human-readable reason.
        reason: String,
    },
}
