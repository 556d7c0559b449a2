//! Null-object [`KvCache`] standing in for "cache not configured".
//!
//! §4.4 and §4.5 both specify an explicit not-configured branch (similarity
//! lookup returns `(nil, nil)`; the anonymous cache's `Put` is a no-op
//! success and its `Get` always reports not-found). Plugging this in as the
//! `K` for [`super::SimilarityAnswerCache`]/[`super::AnonymousResultCache`]
//! reproduces both without any special-casing in those callers: every read
//! misses, every write is discarded.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::kv::{CacheError, KvCache};

/// A [`KvCache`] that stores nothing: every read misses, every write
/// succeeds and is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopKvCache;

impl NoopKvCache {
    /// Creates the null cache.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KvCache for NoopKvCache {
    async fn get(&self, _key: &str) -> Result<Vec<u8>, CacheError> {
        Err(CacheError::Miss)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn hget_all(&self, _key: &str) -> Result<HashMap<String, Vec<u8>>, CacheError> {
        Ok(HashMap::new())
    }

    async fn hset(&self, _key: &str, _field: &str, _value: Vec<u8>) -> Result<(), CacheError> {
        Ok(())
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{AnonymousResultCache, SimilarityAnswerCache};
    use crate::orchestrator::types::EvaluationPayload;
    use crate::quiz::mock::InMemoryQuizRepository;
    use crate::quiz::QuizId;
    use std::sync::Arc;

    fn sample_payload() -> EvaluationPayload {
        EvaluationPayload {
            score: 0.8,
            explanation: "fine".to_string(),
            keyword_matches: vec![],
            completeness: 0.8,
            relevance: 0.8,
            accuracy: 0.8,
            model_answer: None,
        }
    }

    #[tokio::test]
    async fn unconfigured_similarity_cache_always_misses() {
        let cache = SimilarityAnswerCache::new(
            Arc::new(NoopKvCache::new()),
            Arc::new(InMemoryQuizRepository::new(vec![])),
            0.9,
            Duration::from_secs(60),
        );
        let quiz_id = QuizId::parse("01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap();

        cache
            .put(&quiz_id, "an answer", &[0.1, 0.2, 0.3], sample_payload())
            .await
            .unwrap();

        let result = cache.get(&quiz_id, &[0.1, 0.2, 0.3], "an answer").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn unconfigured_anonymous_cache_put_is_a_no_op_and_get_never_finds_anything() {
        let cache = AnonymousResultCache::new(Arc::new(NoopKvCache::new()), Duration::from_secs(60));

        cache.put("req-1", &sample_payload()).await.unwrap();

        let result = cache.get("req-1").await;
        assert!(result.is_err());
    }
}
