//! Evaluation Orchestrator (§4.7): ties every collaborator together into one
//! `check_answer` operation.

pub mod error;
pub mod types;

pub use error::OrchestratorError;
pub use types::{CheckAnswerOutcome, EvaluationPayload};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info_span, instrument, warn, Instrument};
use ulid::Ulid;

use crate::attempt::{AttemptRecord, AttemptRecorder, AttemptRepository};
use crate::cache::{AnonymousResultCache, KvCache, SimilarityAnswerCache};
use crate::constants::MAX_USER_ANSWER_LEN;
use crate::embedding::EmbeddingProvider;
use crate::llm::LlmEvaluator;
use crate::quiz::{QuizId, QuizRepository};

/// Who is making the request: an authenticated user or an anonymous caller.
///
/// Populated by upstream auth middleware; the orchestrator only reads it.
#[derive(Debug, Clone)]
pub enum RequestAuth {
    /// An authenticated user, identified by a stable user id.
    User(String),
    /// No authenticated identity.
    Anonymous,
}

/// Combines the Embedding Provider, Similarity Answer Cache, Anonymous
/// Result Cache, LLM Evaluator, Quiz Repository, and Async Attempt Recorder
/// into the single `check_answer` operation (§4.7).
pub struct Orchestrator<E, K, L, Q, A>
where
    E: EmbeddingProvider,
    K: KvCache,
    L: LlmEvaluator,
    Q: QuizRepository,
    A: AttemptRepository + 'static,
{
    embedding: Arc<E>,
    similarity_cache: SimilarityAnswerCache<K>,
    anonymous_cache: AnonymousResultCache<K>,
    llm: Arc<L>,
    quizzes: Arc<Q>,
    attempt_recorder: AttemptRecorder<A>,
    correctness_threshold: f32,
}

impl<E, K, L, Q, A> Orchestrator<E, K, L, Q, A>
where
    E: EmbeddingProvider,
    K: KvCache,
    L: LlmEvaluator,
    Q: QuizRepository,
    A: AttemptRepository + 'static,
{
    /// Wires together the orchestrator's collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        embedding: Arc<E>,
        similarity_cache: SimilarityAnswerCache<K>,
        anonymous_cache: AnonymousResultCache<K>,
        llm: Arc<L>,
        quizzes: Arc<Q>,
        attempt_repository: Arc<A>,
        correctness_threshold: f32,
    ) -> Self {
        Self {
            embedding,
            similarity_cache,
            anonymous_cache,
            llm,
            quizzes,
            attempt_recorder: AttemptRecorder::new(attempt_repository),
            correctness_threshold,
        }
    }

    /// Runs the full §4.7 algorithm for one answer submission.
    #[instrument(skip(self, user_answer_text), fields(quiz_id = %quiz_id))]
    pub async fn check_answer(
        &self,
        quiz_id: &str,
        user_answer_text: &str,
        auth: RequestAuth,
    ) -> Result<CheckAnswerOutcome, OrchestratorError> {
        // 1. Validate.
        let quiz_id = QuizId::parse(quiz_id)?;
        if user_answer_text.is_empty() || user_answer_text.chars().count() > MAX_USER_ANSWER_LEN {
            return Err(OrchestratorError::Validation {
                message: format!(
                    "user_answer must be 1..={MAX_USER_ANSWER_LEN} characters, got {}",
                    user_answer_text.chars().count()
                ),
            });
        }

        // 2. Look up the quiz.
        let quiz = self
            .quizzes
            .get_quiz_by_id(&quiz_id)
            .await?
            .ok_or(OrchestratorError::QuizNotFound)?;
        if quiz.model_answers.is_empty() {
            return Err(OrchestratorError::DataIntegrity);
        }

        // 3. Generate the embedding; failures bypass the cache entirely.
        let embedding = match self.embedding.embed_query(user_answer_text).await {
            Ok(vector) => Some(vector),
            Err(err) => {
                warn!(error = %err, "embedding generation failed, bypassing cache");
                None
            }
        };

        // 4. Similarity-cache Get.
        let mut evaluation = if let Some(vector) = embedding.as_deref() {
            match self
                .similarity_cache
                .get(&quiz_id, vector, user_answer_text)
                .await
            {
                Ok(hit) => hit,
                Err(err) => {
                    warn!(error = %err, "similarity cache lookup failed, treating as miss");
                    None
                }
            }
        } else {
            None
        };

        if evaluation.is_none() {
            // 5. Invoke the LLM Evaluator.
            let model_answer = &quiz.model_answers[0];
            let evaluated = self
                .llm
                .evaluate(&quiz.question, model_answer, user_answer_text, &quiz.keywords)
                .await?;

            // 6. Similarity-cache Put, best-effort.
            if let Some(vector) = embedding.as_deref() {
                if let Err(err) = self
                    .similarity_cache
                    .put(&quiz_id, user_answer_text, vector, evaluated.clone())
                    .await
                {
                    warn!(error = %err, "similarity cache write failed, response unaffected");
                }
            }

            evaluation = Some(evaluated);
        }

        // 7. Attach a fresh `model_answer` field for freshness.
        let mut evaluation = evaluation.expect("evaluation is populated by either path above");
        evaluation.model_answer = Some(quiz.joined_model_answers());

        // 8. Side effects.
        let anonymous_request_id = match auth {
            RequestAuth::User(user_id) => {
                let record = AttemptRecord::new(
                    user_id,
                    quiz_id.clone(),
                    user_answer_text.to_string(),
                    evaluation.clone(),
                    self.correctness_threshold,
                    Utc::now(),
                );
                self.attempt_recorder.record_detached(record);
                None
            }
            RequestAuth::Anonymous => {
                let request_id = Ulid::new().to_string();
                let evaluation_for_cache = evaluation.clone();
                let anonymous_cache_key = request_id.clone();
                let span = info_span!("anonymous_cache_put", request_id = %anonymous_cache_key);
                // Best-effort, logged-only per §7; not detached from the
                // request like the attempt recorder since it's cheap and
                // the request hasn't returned yet.
                async {
                    if let Err(err) = self.anonymous_cache.put(&anonymous_cache_key, &evaluation_for_cache).await {
                        warn!(error = %err, "anonymous cache write failed, response unaffected");
                    }
                }
                .instrument(span)
                .await;
                Some(request_id)
            }
        };

        // 9. Return the evaluation alongside the anonymous lookup key, if any.
        Ok(CheckAnswerOutcome {
            evaluation,
            anonymous_request_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attempt::mock::InMemoryAttemptRepository;
    use crate::cache::memory_kv::InMemoryKvCache;
    use crate::llm::LlmError;
    use crate::quiz::mock::InMemoryQuizRepository;
    use crate::quiz::{Difficulty, Quiz};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockEmbedder {
        calls: AtomicUsize,
        vector: Vec<f32>,
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, crate::embedding::EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(crate::embedding::EmbeddingError::UpstreamUnavailable {
                    reason: "down".to_string(),
                })
            } else {
                Ok(self.vector.clone())
            }
        }
    }

    struct MockLlm {
        calls: AtomicUsize,
        response: Result<EvaluationPayload, String>,
    }

    #[async_trait]
    impl LlmEvaluator for MockLlm {
        async fn evaluate(
            &self,
            _question: &str,
            _model_answer: &str,
            _user_answer: &str,
            _keywords: &[String],
        ) -> Result<EvaluationPayload, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(|reason| LlmError::UpstreamUnavailable { reason })
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

    fn llm_payload(score: f32) -> EvaluationPayload {
        EvaluationPayload {
            score,
            explanation: "OK".to_string(),
            keyword_matches: vec!["pointer".to_string()],
            completeness: 0.9,
            relevance: 0.9,
            accuracy: 0.9,
            model_answer: None,
        }
    }

    #[allow(clippy::type_complexity)]
    fn build(
        embedder_fail: bool,
        llm_response: Result<EvaluationPayload, String>,
    ) -> (
        Orchestrator<MockEmbedder, InMemoryKvCache, MockLlm, InMemoryQuizRepository, InMemoryAttemptRepository>,
        Arc<InMemoryAttemptRepository>,
    ) {
        let kv = Arc::new(InMemoryKvCache::new());
        let quizzes = Arc::new(InMemoryQuizRepository::new(vec![sample_quiz()]));
        let attempts = Arc::new(InMemoryAttemptRepository::new());
        let orchestrator = Orchestrator::new(
            Arc::new(MockEmbedder {
                calls: AtomicUsize::new(0),
                vector: vec![0.1, 0.2, 0.3],
                fail: embedder_fail,
            }),
            SimilarityAnswerCache::new(Arc::clone(&kv), quizzes.clone(), 0.9, Duration::from_secs(60)),
            AnonymousResultCache::new(Arc::clone(&kv), Duration::from_secs(60)),
            Arc::new(MockLlm {
                calls: AtomicUsize::new(0),
                response: llm_response,
            }),
            quizzes,
            Arc::clone(&attempts),
            0.7,
        );
        (orchestrator, attempts)
    }

    #[tokio::test]
    async fn validation_error_for_empty_answer() {
        let (orchestrator, _) = build(false, Ok(llm_payload(0.9)));
        let result = orchestrator
            .check_answer(quiz_id().as_str(), "", RequestAuth::Anonymous)
            .await;
        assert!(matches!(result, Err(OrchestratorError::Validation { .. })));
    }

    #[tokio::test]
    async fn validation_error_for_malformed_quiz_id() {
        let (orchestrator, _) = build(false, Ok(llm_payload(0.9)));
        let result = orchestrator
            .check_answer("not-a-ulid", "an answer", RequestAuth::Anonymous)
            .await;
        assert!(matches!(result, Err(OrchestratorError::Validation { .. })));
    }

    #[tokio::test]
    async fn quiz_not_found_for_unknown_quiz() {
        let (orchestrator, _) = build(false, Ok(llm_payload(0.9)));
        let unknown = "01BX5ZZKBKACTAV9WEVGEMMVRY";
        let result = orchestrator
            .check_answer(unknown, "an answer", RequestAuth::Anonymous)
            .await;
        assert!(matches!(result, Err(OrchestratorError::QuizNotFound)));
    }

    #[tokio::test]
    async fn miss_then_llm_populates_cache_and_returns_score() {
        let (orchestrator, _) = build(false, Ok(llm_payload(0.92)));
        let result = orchestrator
            .check_answer(quiz_id().as_str(), "a pointer holds an address", RequestAuth::Anonymous)
            .await
            .unwrap();
        assert_eq!(result.evaluation.score, 0.92);
        assert_eq!(result.evaluation.model_answer.as_deref(), Some("A pointer is ..."));
        assert!(result.anonymous_request_id.is_some());
    }

    #[tokio::test]
    async fn llm_error_surfaces_as_upstream_unavailable_and_skips_attempt_recording() {
        let (orchestrator, attempts) = build(false, Err("boom".to_string()));
        let result = orchestrator
            .check_answer(
                quiz_id().as_str(),
                "a pointer holds an address",
                RequestAuth::User("user-1".to_string()),
            )
            .await;
        assert!(matches!(result, Err(OrchestratorError::UpstreamUnavailable { .. })));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(attempts.call_count(), 0);
    }

    #[tokio::test]
    async fn embedding_failure_bypasses_cache_but_still_succeeds() {
        let (orchestrator, _) = build(true, Ok(llm_payload(0.8)));
        let result = orchestrator
            .check_answer(quiz_id().as_str(), "a pointer holds an address", RequestAuth::Anonymous)
            .await
            .unwrap();
        assert_eq!(result.evaluation.score, 0.8);
    }

    #[tokio::test]
    async fn anonymous_success_never_invokes_attempt_repository() {
        let (orchestrator, attempts) = build(false, Ok(llm_payload(0.9)));
        orchestrator
            .check_answer(quiz_id().as_str(), "a pointer holds an address", RequestAuth::Anonymous)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(attempts.call_count(), 0);
    }

    #[tokio::test]
    async fn authenticated_success_invokes_attempt_repository_exactly_once_with_correct_is_correct() {
        let (orchestrator, attempts) = build(false, Ok(llm_payload(0.92)));
        let result = orchestrator
            .check_answer(
                quiz_id().as_str(),
                "a pointer holds an address",
                RequestAuth::User("user-1".to_string()),
            )
            .await
            .unwrap();
        assert!(result.anonymous_request_id.is_none());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(attempts.call_count(), 1);
        assert!(attempts.recorded()[0].is_correct);
    }
}
