//! Async Attempt Recorder (§4.8): persists authenticated attempts without
//! making the evaluation request wait on storage.

mod error;
mod model;

pub use error::AttemptRepositoryError;
pub use model::AttemptRecord;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info_span, Instrument};

/// Durable store for [`AttemptRecord`]s.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Persists `attempt`. Failures here must never surface to the caller
    /// that triggered the evaluation — see [`AttemptRecorder`].
    async fn create_attempt(&self, attempt: &AttemptRecord) -> Result<(), AttemptRepositoryError>;
}

/// Fire-and-forget wrapper around an [`AttemptRepository`].
///
/// `record_detached` spawns a new task rooted in its own tracing span, not
/// the caller's. The spawned task outlives the HTTP request: it is not
/// cancelled when the request that triggered it finishes, and any error it
/// hits is logged, never propagated.
pub struct AttemptRecorder<R: AttemptRepository + 'static> {
    repository: Arc<R>,
}

impl<R: AttemptRepository + 'static> AttemptRecorder<R> {
    /// Wraps `repository` for detached recording.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Spawns an independent task that persists `attempt`, logging (but not
    /// propagating) any failure. Returns immediately.
    pub fn record_detached(&self, attempt: AttemptRecord) {
        let repository = Arc::clone(&self.repository);
        let span = info_span!("attempt_recorder", attempt_id = %attempt.id, quiz_id = %attempt.quiz_id);
        tokio::spawn(
            async move {
                if let Err(err) = repository.create_attempt(&attempt).await {
                    error!(error = %err, "failed to persist attempt record");
                }
            }
            .instrument(span),
        );
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! In-memory [`AttemptRepository`] for tests.

    use std::sync::Mutex;

    use super::*;

    /// Records every attempt passed to it for later assertion.
    #[derive(Default)]
    pub struct InMemoryAttemptRepository {
        attempts: Mutex<Vec<AttemptRecord>>,
    }

    impl InMemoryAttemptRepository {
        /// Builds an empty repository.
        pub fn new() -> Self {
            Self::default()
        }

        /// Returns a snapshot of every attempt recorded so far.
        pub fn recorded(&self) -> Vec<AttemptRecord> {
            self.attempts.lock().expect("lock poisoned").clone()
        }

        /// Number of attempts recorded so far.
        pub fn call_count(&self) -> usize {
            self.attempts.lock().expect("lock poisoned").len()
        }
    }

    #[async_trait]
    impl AttemptRepository for InMemoryAttemptRepository {
        async fn create_attempt(&self, attempt: &AttemptRecord) -> Result<(), AttemptRepositoryError> {
            self.attempts.lock().expect("lock poisoned").push(attempt.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::mock::InMemoryAttemptRepository;
    use super::*;
    use crate::orchestrator::types::EvaluationPayload;
    use crate::quiz::QuizId;

    fn sample_attempt() -> AttemptRecord {
        AttemptRecord::new(
            "user-1".to_string(),
            QuizId::parse("01ARZ3NDEKTSV4RRFFQ69G5FAV").unwrap(),
            "answer".to_string(),
            EvaluationPayload {
                score: 0.8,
                explanation: String::new(),
                keyword_matches: vec![],
                completeness: 0.0,
                relevance: 0.0,
                accuracy: 0.0,
                model_answer: None,
            },
            0.7,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn record_detached_eventually_persists_the_attempt() {
        let repository = Arc::new(InMemoryAttemptRepository::new());
        let recorder = AttemptRecorder::new(Arc::clone(&repository));

        recorder.record_detached(sample_attempt());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(repository.call_count(), 1);
    }

    #[tokio::test]
    async fn record_detached_returns_before_persistence_completes() {
        let repository = Arc::new(InMemoryAttemptRepository::new());
        let recorder = AttemptRecorder::new(Arc::clone(&repository));

        recorder.record_detached(sample_attempt());
        // No await point guarantees completion here; this just asserts the
        // call itself doesn't block on the repository.
    }
}
