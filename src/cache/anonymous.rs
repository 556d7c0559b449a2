//! Anonymous Result Cache (§4.5): opaque per-request memoization of a full
//! evaluation response, keyed by a freshly minted identifier rather than by
//! content.

use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use super::kv::{CacheError, KvCache};
use crate::hashing;
use crate::orchestrator::types::EvaluationPayload;

/// Errors returned by [`AnonymousResultCache`].
#[derive(Debug, Error)]
pub enum AnonymousCacheError {
    /// Neither the request id nor a stored (non-empty) value was found.
    #[error("anonymous result not found")]
    NotFound,

    /// The stored value could not be decoded.
    #[error("failed to decode anonymous result: {0}")]
    Decode(String),

    /// The cache backend rejected the write.
    #[error("anonymous cache write failed: {0}")]
    WriteFailed(#[source] CacheError),
}

/// Per-request memoization of a full [`EvaluationPayload`], encoded as JSON.
pub struct AnonymousResultCache<K: KvCache> {
    kv: Arc<K>,
    ttl: std::time::Duration,
}

impl<K: KvCache> AnonymousResultCache<K> {
    /// Creates a new cache over `kv` using the given entry TTL.
    pub fn new(kv: Arc<K>, ttl: std::time::Duration) -> Self {
        Self { kv, ttl }
    }

    /// JSON-encodes `result` and stores it under a key derived from `request_id`.
    #[instrument(skip(self, result))]
    pub async fn put(
        &self,
        request_id: &str,
        result: &EvaluationPayload,
    ) -> Result<(), AnonymousCacheError> {
        let encoded =
            serde_json::to_vec(result).map_err(|e| AnonymousCacheError::Decode(e.to_string()))?;
        self.kv
            .set(&hashing::anonymous_result_key(request_id), encoded, self.ttl)
            .await
            .map_err(AnonymousCacheError::WriteFailed)?;
        Ok(())
    }

    /// Reads back a previously stored result. A missing key or an empty
    /// stored value both surface as [`AnonymousCacheError::NotFound`].
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        request_id: &str,
    ) -> Result<EvaluationPayload, AnonymousCacheError> {
        let bytes = match self.kv.get(&hashing::anonymous_result_key(request_id)).await {
            Ok(bytes) => bytes,
            Err(CacheError::Miss) => return Err(AnonymousCacheError::NotFound),
            Err(_) => return Err(AnonymousCacheError::NotFound),
        };

        if bytes.is_empty() {
            return Err(AnonymousCacheError::NotFound);
        }

        serde_json::from_slice(&bytes).map_err(|e| AnonymousCacheError::Decode(e.to_string()))
    }
}
