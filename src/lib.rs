//! # rubric-eval
//!
//! Semantic answer-evaluation pipeline for an LLM-backed quiz service: a
//! similarity-keyed cache of prior LLM evaluations, single-flight
//! coordination over embedding generation, and the orchestration that ties
//! embedding, cache, and LLM calls into one `check_answer` operation.
//!
//! ```text
//! Request → embed(answer) [single-flight] → Similarity Cache → on miss, LLM → cache write → response
//! ```
//!
//! ## Feature flags
//!
//! | Feature | Purpose |
//! |---------|---------|
//! | `mock` | In-memory collaborators for tests/examples |
//!
//! ## Modules
//!
//! - [`orchestrator`] - `check_answer`, the operation that combines every collaborator below
//! - [`embedding`] - Embedding Provider Adapter (§4.1)
//! - [`singleflight`] - generic single-flight coordinator (§4.2)
//! - [`cache`] - Vector KV Cache, Similarity Answer Cache, Anonymous Result Cache
//! - [`llm`] - LLM Evaluator and response parsing (§4.6)
//! - [`quiz`] - external quiz repository contract
//! - [`attempt`] - async attempt recorder (§4.8)
//! - [`config`] - environment-backed configuration
//! - [`lifecycle`] - graceful shutdown / request draining
//! - [`gateway`] - thin HTTP surface over the orchestrator
//! - [`hashing`] - cache-key derivation

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod attempt;
pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod lifecycle;
pub mod llm;
pub mod orchestrator;
pub mod quiz;
pub mod singleflight;

pub use attempt::{AttemptRecord, AttemptRecorder, AttemptRepository, AttemptRepositoryError};
pub use cache::{
    AnonymousCacheError, AnonymousResultCache, CacheError, CachedEvaluation, InMemoryKvCache,
    KvCache, NoopKvCache, RedisKvCache, SimilarityAnswerCache, SimilarityCacheError,
    cosine_similarity,
};
pub use config::{CacheConfig, Config, ConfigError, EmbeddingConfig, EmbeddingProviderKind, EvaluationConfig, LlmConfig};
pub use embedding::{CachedEmbeddingProvider, EmbeddingError, EmbeddingProvider, UpstreamEmbedder};
pub use hashing::{anonymous_result_key, embedding_key, sha256_hex, similarity_bucket_key, similarity_field_key};
pub use lifecycle::{DrainResult, LifecycleConfig, LifecycleError, LifecycleManager, RequestGuard};
pub use llm::{HttpLlmEvaluator, LlmError, LlmEvaluator};
pub use orchestrator::{CheckAnswerOutcome, EvaluationPayload, Orchestrator, OrchestratorError, RequestAuth};
pub use quiz::{Difficulty, Quiz, QuizId, QuizIdError, QuizRepository, QuizRepositoryError};
pub use singleflight::{Group, LeaderCancelled};
