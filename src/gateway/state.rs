//! Axum router state: a thin wrapper around the [`Orchestrator`].

use std::sync::Arc;

use crate::attempt::AttemptRepository;
use crate::cache::KvCache;
use crate::embedding::EmbeddingProvider;
use crate::lifecycle::LifecycleManager;
use crate::llm::LlmEvaluator;
use crate::orchestrator::Orchestrator;
use crate::quiz::QuizRepository;

/// Shared application state injected into every gateway handler.
pub struct HandlerState<E, K, L, Q, A>
where
    E: EmbeddingProvider,
    K: KvCache,
    L: LlmEvaluator,
    Q: QuizRepository,
    A: AttemptRepository + 'static,
{
    pub orchestrator: Arc<Orchestrator<E, K, L, Q, A>>,
    /// Tracks this request for graceful-shutdown draining; see
    /// [`LifecycleManager::begin_request`].
    pub lifecycle: Arc<LifecycleManager>,
}

impl<E, K, L, Q, A> Clone for HandlerState<E, K, L, Q, A>
where
    E: EmbeddingProvider,
    K: KvCache,
    L: LlmEvaluator,
    Q: QuizRepository,
    A: AttemptRepository + 'static,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }
}

impl<E, K, L, Q, A> HandlerState<E, K, L, Q, A>
where
    E: EmbeddingProvider,
    K: KvCache,
    L: LlmEvaluator,
    Q: QuizRepository,
    A: AttemptRepository + 'static,
{
    /// Wraps an [`Orchestrator`] for use as Axum router state, draining
    /// through `lifecycle` on shutdown.
    pub fn new(orchestrator: Arc<Orchestrator<E, K, L, Q, A>>, lifecycle: Arc<LifecycleManager>) -> Self {
        Self {
            orchestrator,
            lifecycle,
        }
    }
}
