//! Vector KV Cache interface (§4.3): the narrow operation set every cache
//! adapter (production or in-memory) must expose to the rest of the crate.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a [`KvCache`] implementation.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The requested key (or field) does not exist.
    #[error("cache miss")]
    Miss,

    /// The backend is unreachable or returned a transport-level error.
    #[error("cache backend unavailable: {reason}")]
    Unavailable {
        /// Human-readable reason.
        reason: String,
    },

    /// A stored value could not be decoded.
    #[error("cache codec error: {0}")]
    Codec(String),
}

/// The operation set the core depends on from a key-value cache backend.
///
/// Hash operations (`hget_all`/`hset`) model a mapping per top-level key;
/// individual fields do not carry their own TTL — the whole key expires
/// together, refreshed explicitly via [`KvCache::expire`].
#[async_trait]
pub trait KvCache: Send + Sync {
    /// Reads a plain key. Returns [`CacheError::Miss`] if absent or expired.
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError>;

    /// Writes a plain key with the given TTL, overwriting any prior value.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Deletes a key. A missing key is a no-op, not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Reads every field of a hash bucket. Returns an empty map (not a miss)
    /// when the bucket has no entries.
    async fn hget_all(&self, key: &str) -> Result<HashMap<String, Vec<u8>>, CacheError>;

    /// Writes one field of a hash bucket, creating the bucket if necessary.
    async fn hset(&self, key: &str, field: &str, value: Vec<u8>) -> Result<(), CacheError>;

    /// Refreshes the TTL of an entire key (plain or hash bucket).
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Liveness check against the backend.
    async fn ping(&self) -> Result<(), CacheError>;
}
