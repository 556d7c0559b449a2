//! Caching + single-flight wrapper that turns an [`UpstreamEmbedder`] into a
//! full [`EmbeddingProvider`], per §4.1's algorithm.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{instrument, warn};

use super::{EmbeddingError, EmbeddingProvider, UpstreamEmbedder};
use crate::cache::{KvCache, codec, kv::CacheError};
use crate::hashing;
use crate::singleflight::Group;

/// Wraps an [`UpstreamEmbedder`] with an embedding cache and a single-flight
/// coordinator so concurrent calls for the same text produce at most one
/// upstream request.
pub struct CachedEmbeddingProvider<U: UpstreamEmbedder, K: KvCache> {
    upstream: Arc<U>,
    kv: Arc<K>,
    single_flight: Arc<Group<String, Vec<f32>, EmbeddingError>>,
    ttl: Duration,
}

impl<U: UpstreamEmbedder, K: KvCache> CachedEmbeddingProvider<U, K> {
    /// Builds a cached provider over `upstream`, storing hits in `kv` with
    /// the given embedding TTL.
    pub fn new(upstream: Arc<U>, kv: Arc<K>, ttl: Duration) -> Self {
        Self {
            upstream,
            kv,
            single_flight: Arc::new(Group::new()),
            ttl,
        }
    }
}

#[async_trait]
impl<U: UpstreamEmbedder + 'static, K: KvCache + 'static> EmbeddingProvider
    for CachedEmbeddingProvider<U, K>
{
    #[instrument(skip(self, text))]
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput {
                reason: "text must be non-empty".to_string(),
            });
        }

        let key = hashing::embedding_key(self.upstream.provider_name(), text);

        match self.kv.get(&key).await {
            Ok(bytes) => match codec::decode_embedding(&bytes) {
                Ok(vector) => return Ok(vector),
                Err(err) => {
                    warn!(error = %err, "embedding cache entry undecodable, treating as miss");
                }
            },
            Err(CacheError::Miss) => {}
            Err(err) => {
                warn!(error = %err, "embedding cache read failed, treating as miss");
            }
        }

        let upstream = Arc::clone(&self.upstream);
        let text_owned = text.to_string();
        let vector = self
            .single_flight
            .work(key.clone(), move || async move { upstream.embed(&text_owned).await })
            .await
            .map_err(|arc_err| (*arc_err).clone())?;

        if let Ok(blob) = codec::encode_embedding(&vector) {
            if let Err(err) = self.kv.set(&key, blob, self.ttl).await {
                warn!(error = %err, "embedding cache write failed, returning vector anyway");
            }
        }

        Ok(vector)
    }
}
