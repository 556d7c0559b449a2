//! Similarity Answer Cache (§4.4): finds a previously evaluated answer whose
//! embedding is cosine-close enough to the query to reuse its evaluation.

use std::sync::Arc;

use thiserror::Error;
use tracing::{instrument, warn};

use super::codec;
use super::kv::KvCache;
use super::types::CachedEvaluation;
use crate::hashing;
use crate::orchestrator::types::EvaluationPayload;
use crate::quiz::{QuizId, QuizRepository};

/// Errors returned by [`SimilarityAnswerCache`].
#[derive(Debug, Error)]
pub enum SimilarityCacheError {
    /// A cosine-similarity input was empty or the two vectors had different lengths.
    #[error("invalid similarity input: {reason}")]
    InvalidInput {
        /// Human-readable reason.
        reason: String,
    },

    /// A write (`HSet`/`Expire`) to the cache backend failed.
    #[error("similarity cache write failed: {0}")]
    WriteFailed(#[source] super::kv::CacheError),
}

/// Computes cosine similarity between two vectors.
///
/// Fails with [`SimilarityCacheError::InvalidInput`] when dimensions differ
/// or either vector is empty; returns `Ok(0.0)` (not an error) when either
/// vector has zero magnitude, matching §4.4.1 exactly.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityCacheError> {
    if a.is_empty() || b.is_empty() {
        return Err(SimilarityCacheError::InvalidInput {
            reason: "vectors must be non-empty".to_string(),
        });
    }
    if a.len() != b.len() {
        return Err(SimilarityCacheError::InvalidInput {
            reason: format!("dimension mismatch: {} vs {}", a.len(), b.len()),
        });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Cache of prior LLM evaluations per quiz, keyed by cosine similarity over
/// answer embeddings.
pub struct SimilarityAnswerCache<K: KvCache> {
    kv: Arc<K>,
    quizzes: Arc<dyn QuizRepository>,
    threshold: f32,
    bucket_ttl: std::time::Duration,
}

impl<K: KvCache> SimilarityAnswerCache<K> {
    /// Creates a new cache over `kv`, using `quizzes` to refresh the
    /// `model_answer` field on cache hits.
    pub fn new(
        kv: Arc<K>,
        quizzes: Arc<dyn QuizRepository>,
        threshold: f32,
        bucket_ttl: std::time::Duration,
    ) -> Self {
        Self {
            kv,
            quizzes,
            threshold,
            bucket_ttl,
        }
    }

    /// Looks up an entry whose stored embedding is cosine-similar (≥ τ) to
    /// `user_answer_embedding`. Returns `Ok(None)` on a plain miss or a
    /// below-threshold scan; errors are reserved for truly unexpected
    /// failures (there currently are none: cache-read errors are treated as
    /// a miss per §4.3/§7).
    #[instrument(skip(self, user_answer_embedding, _user_answer_text))]
    pub async fn get(
        &self,
        quiz_id: &QuizId,
        user_answer_embedding: &[f32],
        _user_answer_text: &str,
    ) -> Result<Option<EvaluationPayload>, SimilarityCacheError> {
        if user_answer_embedding.is_empty() {
            return Ok(None);
        }

        let bucket_key = hashing::similarity_bucket_key(quiz_id.as_str());
        let fields = match self.kv.hget_all(&bucket_key).await {
            Ok(fields) => fields,
            Err(err) => {
                warn!(error = %err, "similarity cache HGetAll failed, treating as miss");
                return Ok(None);
            }
        };

        for (field, blob) in fields {
            let stored = match codec::decode_cached_evaluation(&blob) {
                Ok(stored) => stored,
                Err(err) => {
                    warn!(%field, error = %err, "skipping undecodable similarity cache entry");
                    continue;
                }
            };

            if stored.embedding.is_empty() {
                continue;
            }

            let similarity = match cosine_similarity(user_answer_embedding, &stored.embedding) {
                Ok(similarity) => similarity,
                Err(err) => {
                    warn!(%field, error = %err, "skipping incomparable similarity cache entry");
                    continue;
                }
            };

            if similarity >= self.threshold {
                return Ok(Some(self.refresh_model_answer(quiz_id, stored).await));
            }
        }

        Ok(None)
    }

    async fn refresh_model_answer(
        &self,
        quiz_id: &QuizId,
        stored: CachedEvaluation,
    ) -> EvaluationPayload {
        let mut evaluation = stored.evaluation;
        match self.quizzes.get_quiz_by_id(quiz_id).await {
            Ok(Some(quiz)) => evaluation.model_answer = Some(quiz.joined_model_answers()),
            Ok(None) | Err(_) => {}
        }
        evaluation
    }

    /// Writes a new entry and refreshes the bucket TTL. A no-op (not an
    /// error) when `embedding` is empty.
    #[instrument(skip(self, user_answer_embedding, evaluation))]
    pub async fn put(
        &self,
        quiz_id: &QuizId,
        user_answer_text: &str,
        user_answer_embedding: &[f32],
        evaluation: EvaluationPayload,
    ) -> Result<(), SimilarityCacheError> {
        if user_answer_embedding.is_empty() {
            return Ok(());
        }

        let entry = CachedEvaluation {
            evaluation,
            embedding: user_answer_embedding.to_vec(),
            user_answer_text: user_answer_text.to_string(),
        };
        let blob = codec::encode_cached_evaluation(&entry).map_err(|e| {
            SimilarityCacheError::InvalidInput {
                reason: e.to_string(),
            }
        })?;

        let bucket_key = hashing::similarity_bucket_key(quiz_id.as_str());
        let field_key = hashing::similarity_field_key(user_answer_text);

        self.kv
            .hset(&bucket_key, &field_key, blob)
            .await
            .map_err(SimilarityCacheError::WriteFailed)?;

        self.kv
            .expire(&bucket_key, self.bucket_ttl)
            .await
            .map_err(SimilarityCacheError::WriteFailed)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory_kv::InMemoryKvCache;
    use crate::quiz::mock::InMemoryQuizRepository;
    use crate::quiz::{Difficulty, Quiz};

    fn sample_payload(score: f32) -> EvaluationPayload {
        EvaluationPayload {
            score,
            explanation: "OK".to_string(),
            keyword_matches: vec!["pointer".to_string()],
            completeness: 0.8,
            relevance: 0.9,
            accuracy: 0.8,
            model_answer: None,
        }
    }

    fn quiz_id() -> QuizId {
        QuizId::parse("01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap()
    }

    fn sample_quiz() -> Quiz {
        Quiz {
            id: quiz_id(),
            question: "What is a pointer?".to_string(),
            model_answers: vec!["A pointer is ...".to_string()],
            keywords: vec!["pointer".to_string()],
            difficulty: Difficulty::Easy,
            sub_category_id: "cs".to_string(),
        }
    }

    fn cache() -> SimilarityAnswerCache<InMemoryKvCache> {
        let repo = InMemoryQuizRepository::new(vec![sample_quiz()]);
        SimilarityAnswerCache::new(
            Arc::new(InMemoryKvCache::new()),
            Arc::new(repo),
            0.9,
            std::time::Duration::from_secs(60),
        )
    }

    #[test]
    fn cosine_similarity_is_symmetric_and_self_similarity_is_one() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, -1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), cosine_similarity(&b, &a).unwrap());
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_of_opposite_vectors_is_negative_one() {
        let a = vec![1.0, 2.0, 3.0];
        let negated: Vec<f32> = a.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&a, &negated).unwrap() - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_rejects_dimension_mismatch() {
        assert!(cosine_similarity(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn cosine_similarity_rejects_empty_input() {
        assert!(cosine_similarity(&[], &[1.0]).is_err());
    }

    #[test]
    fn cosine_similarity_of_zero_vector_is_zero_not_error() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[tokio::test]
    async fn get_on_empty_bucket_returns_none() {
        let cache = cache();
        let result = cache.get(&quiz_id(), &[0.1, 0.2, 0.3], "x").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn put_then_get_returns_stored_evaluation_above_threshold() {
        let cache = cache();
        cache
            .put(&quiz_id(), "what is a pointer", &[0.10, 0.20, 0.30], sample_payload(0.8))
            .await
            .unwrap();

        let result = cache
            .get(&quiz_id(), &[0.11, 0.21, 0.31], "what's a pointer?")
            .await
            .unwrap();
        let evaluation = result.expect("expected a similarity hit");
        assert_eq!(evaluation.score, 0.8);
        assert_eq!(evaluation.model_answer.as_deref(), Some("A pointer is ..."));
    }

    #[tokio::test]
    async fn get_below_threshold_returns_none() {
        let cache = cache();
        cache
            .put(&quiz_id(), "what is a pointer", &[1.0, 0.0, 0.0], sample_payload(0.8))
            .await
            .unwrap();

        let result = cache.get(&quiz_id(), &[0.0, 1.0, 0.0], "unrelated").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn put_with_empty_embedding_is_a_silent_no_op() {
        let cache = cache();
        cache
            .put(&quiz_id(), "text", &[], sample_payload(0.5))
            .await
            .unwrap();
        let result = cache.get(&quiz_id(), &[1.0, 0.0], "text").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn get_with_empty_query_embedding_returns_none() {
        let cache = cache();
        let result = cache.get(&quiz_id(), &[], "text").await.unwrap();
        assert!(result.is_none());
    }
}
