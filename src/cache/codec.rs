//! Self-describing binary codec for cache blobs (§9: "the reference
//! implementation uses a compact self-describing binary format").

use rkyv::rancor::Error as RkyvError;
use rkyv::{from_bytes, to_bytes};

use super::kv::CacheError;
use super::types::CachedEvaluation;

/// Encodes a [`CachedEvaluation`] into its binary blob representation.
pub fn encode_cached_evaluation(entry: &CachedEvaluation) -> Result<Vec<u8>, CacheError> {
    to_bytes::<RkyvError>(entry)
        .map(|bytes| bytes.to_vec())
        .map_err(|e| CacheError::Codec(e.to_string()))
}

/// Decodes a [`CachedEvaluation`] from its binary blob representation.
pub fn decode_cached_evaluation(bytes: &[u8]) -> Result<CachedEvaluation, CacheError> {
    from_bytes::<CachedEvaluation, RkyvError>(bytes).map_err(|e| CacheError::Codec(e.to_string()))
}

/// Encodes a raw embedding vector (used for embedding-cache entries).
pub fn encode_embedding(vector: &[f32]) -> Result<Vec<u8>, CacheError> {
    to_bytes::<RkyvError>(&vector.to_vec())
        .map(|bytes| bytes.to_vec())
        .map_err(|e| CacheError::Codec(e.to_string()))
}

/// Decodes a raw embedding vector (used for embedding-cache entries).
pub fn decode_embedding(bytes: &[u8]) -> Result<Vec<f32>, CacheError> {
    from_bytes::<Vec<f32>, RkyvError>(bytes).map_err(|e| CacheError::Codec(e.to_string()))
}
