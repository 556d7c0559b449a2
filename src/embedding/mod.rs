//! Embedding Provider Adapter (§4.1): produces a fixed-dimension vector for
//! arbitrary text and memoizes per-text, single-flighting concurrent misses.

mod cached;
mod error;
pub mod ollama;
pub mod openai;

pub use cached::CachedEmbeddingProvider;
pub use error::EmbeddingError;

use async_trait::async_trait;

/// Orchestrator-facing embedding contract (§6.2: `EmbedQuery(ctx, text) → []float or error`).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the embedding for `text`. Fails with
    /// [`EmbeddingError::InvalidInput`] for empty text and with
    /// [`EmbeddingError::UpstreamUnavailable`] on provider failure or timeout.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// A single upstream embedding backend, without caching or coalescing.
/// [`CachedEmbeddingProvider`] wraps one of these to form a full
/// [`EmbeddingProvider`].
#[async_trait]
pub trait UpstreamEmbedder: Send + Sync {
    /// Stable provider name; the `<provider>` segment of the embedding cache key.
    fn provider_name(&self) -> &'static str;

    /// Calls the upstream service directly (no cache, no coalescing).
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[async_trait]
impl UpstreamEmbedder for Box<dyn UpstreamEmbedder + Send + Sync> {
    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text).await
    }
}
