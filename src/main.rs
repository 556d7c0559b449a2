//! HTTP server entrypoint wiring the orchestrator's collaborators together
//! and serving the gateway router.
//!
//! The quiz repository and attempt repository are external collaborators
//! (§6.2) owned by the rest of the service; this binary only ships in-memory
//! stand-ins behind the `mock` feature so the crate remains runnable
//! standalone. A real deployment links its own repository implementations
//! against [`rubric_eval::orchestrator::Orchestrator`] instead of this binary.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[cfg(feature = "mock")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run().await
}

#[cfg(not(feature = "mock"))]
fn main() {
    eprintln!(
        "rubricd requires a concrete QuizRepository/AttemptRepository wiring; \
         rebuild with `--features mock` to run the bundled in-memory demo server, \
         or link rubric_eval::orchestrator::Orchestrator against production collaborators."
    );
    std::process::exit(1);
}

#[cfg(feature = "mock")]
async fn run() -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use tokio::net::TcpListener;
    use tokio::signal;

    use rubric_eval::attempt::mock::InMemoryAttemptRepository;
    use rubric_eval::cache::{AnonymousResultCache, RedisKvCache, SimilarityAnswerCache};
    use rubric_eval::config::{Config, EmbeddingProviderKind};
    use rubric_eval::embedding::ollama::OllamaEmbedder;
    use rubric_eval::embedding::openai::OpenAiEmbedder;
    use rubric_eval::embedding::{CachedEmbeddingProvider, UpstreamEmbedder};
    use rubric_eval::gateway::{HandlerState, create_router};
    use rubric_eval::lifecycle::LifecycleManager;
    use rubric_eval::llm::HttpLlmEvaluator;
    use rubric_eval::orchestrator::Orchestrator;
    use rubric_eval::quiz::mock::InMemoryQuizRepository;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    tracing::info!("rubricd starting");

    let lifecycle = Arc::new(LifecycleManager::from_env()?);

    let kv = Arc::new(RedisKvCache::connect(&config.cache.redis_url).await?);

    let upstream: Box<dyn UpstreamEmbedder + Send + Sync> = match config.embedding.provider {
        EmbeddingProviderKind::Ollama => Box::new(OllamaEmbedder::new(
            config.embedding.endpoint.clone(),
            config.embedding.model.clone(),
            config.embedding.timeout,
        )),
        EmbeddingProviderKind::OpenAi => Box::new(OpenAiEmbedder::new(
            config.embedding.endpoint.clone(),
            config.embedding.model.clone(),
            config.embedding.timeout,
        )),
    };
    let embedding = Arc::new(CachedEmbeddingProvider::new(
        Arc::new(upstream),
        Arc::clone(&kv),
        config.cache.embedding_ttl,
    ));

    let quizzes = Arc::new(InMemoryQuizRepository::new(vec![]));
    let attempts = Arc::new(InMemoryAttemptRepository::new());

    let llm: Box<dyn rubric_eval::llm::LlmEvaluator + Send + Sync> = Box::new(HttpLlmEvaluator::new(
        config.llm.endpoint.clone(),
        config.llm.model.clone(),
        config.llm.timeout,
    ));
    let llm = Arc::new(llm);

    let similarity_cache = SimilarityAnswerCache::new(
        Arc::clone(&kv),
        Arc::clone(&quizzes) as Arc<dyn rubric_eval::quiz::QuizRepository>,
        config.embedding.similarity_threshold,
        config.cache.answer_evaluation_ttl,
    );
    let anonymous_cache = AnonymousResultCache::new(Arc::clone(&kv), config.cache.anonymous_result_ttl);

    let orchestrator = Arc::new(Orchestrator::new(
        embedding,
        similarity_cache,
        anonymous_cache,
        llm,
        quizzes,
        attempts,
        config.evaluation.correctness_threshold,
    ));

    let state = HandlerState::new(orchestrator, Arc::clone(&lifecycle));
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("RUBRICD_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(lifecycle))
        .await?;

    tracing::info!("rubricd shutdown complete");
    Ok(())
}

#[cfg(feature = "mock")]
async fn shutdown_signal(lifecycle: std::sync::Arc<rubric_eval::lifecycle::LifecycleManager>) {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, draining in-flight requests"),
        _ = terminate => tracing::info!("received SIGTERM, draining in-flight requests"),
    }

    match lifecycle.shutdown().await {
        rubric_eval::lifecycle::DrainResult::Completed { drained } => {
            tracing::info!(drained, "drain complete");
        }
        rubric_eval::lifecycle::DrainResult::TimedOut { remaining } => {
            tracing::warn!(remaining, "drain deadline elapsed with requests still in flight");
        }
    }
}
