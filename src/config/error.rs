//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `EMBEDDING_PROVIDER` named something other than `ollama`/`openai`.
    #[error("unknown embedding provider '{value}': expected 'ollama' or 'openai'")]
    InvalidProvider { value: String },

    /// A value meant to be parsed as a (0, 1] float was not.
    #[error("invalid value '{value}': expected a number in (0, 1]")]
    InvalidUnitFloat { value: String },
}
