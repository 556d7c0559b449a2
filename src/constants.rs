//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants (e.g. durations) from primary ones to avoid drift.

use std::time::Duration;

/// Default cosine-similarity threshold for the similarity answer cache.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.9;

/// Default TTL for a similarity-cache bucket (`answer:evaluation_map:<quizID>`).
pub const DEFAULT_ANSWER_EVALUATION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default TTL for embedding-cache entries.
pub const DEFAULT_EMBEDDING_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default TTL for anonymous-result entries.
pub const DEFAULT_ANONYMOUS_RESULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default per-call LLM timeout.
pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(20);

/// Default per-call embedding provider timeout.
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(20);

/// Default score threshold above which an attempt is considered correct.
pub const DEFAULT_CORRECTNESS_THRESHOLD: f32 = 0.7;

/// Maximum accepted length (in UTF-8 bytes) of a submitted user answer.
pub const MAX_USER_ANSWER_LEN: usize = 2000;

/// Deadline for draining in-flight requests on graceful shutdown.
pub const DEFAULT_SHUTDOWN_DRAIN_DEADLINE: Duration = Duration::from_secs(10);

/// Length of a Crockford-base32 ULID string.
pub const ULID_LEN: usize = 26;
