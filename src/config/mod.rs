//! Environment-backed configuration surface (§6.3 of the design).

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

/// Which embedding provider backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingProviderKind {
    /// Local/self-hosted Ollama embeddings API.
    #[default]
    Ollama,
    /// OpenAI embeddings API.
    OpenAi,
}

impl std::str::FromStr for EmbeddingProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            other => Err(ConfigError::InvalidProvider {
                value: other.to_string(),
            }),
        }
    }
}

impl EmbeddingProviderKind {
    /// Stable name used as the `<provider>` segment of an embedding cache key.
    pub fn as_key_segment(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }
}

/// Embedding-related configuration (`embedding.*`).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub endpoint: String,
    pub model: String,
    pub similarity_threshold: f32,
    pub timeout: Duration,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            endpoint: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            similarity_threshold: crate::constants::DEFAULT_SIMILARITY_THRESHOLD,
            timeout: crate::constants::DEFAULT_EMBEDDING_TIMEOUT,
        }
    }
}

/// Cache-related configuration (`cache.*`).
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub answer_evaluation_ttl: Duration,
    pub embedding_ttl: Duration,
    pub anonymous_result_ttl: Duration,
    pub redis_url: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            answer_evaluation_ttl: crate::constants::DEFAULT_ANSWER_EVALUATION_TTL,
            embedding_ttl: crate::constants::DEFAULT_EMBEDDING_TTL,
            anonymous_result_ttl: crate::constants::DEFAULT_ANONYMOUS_RESULT_TTL,
            redis_url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// LLM-related configuration (`llm.*`).
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/v1/chat/completions".to_string(),
            model: "llama3".to_string(),
            timeout: crate::constants::DEFAULT_LLM_TIMEOUT,
        }
    }
}

/// Evaluation-related configuration (`evaluation.*`).
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    pub correctness_threshold: f32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            correctness_threshold: crate::constants::DEFAULT_CORRECTNESS_THRESHOLD,
        }
    }
}

/// Full configuration surface recognized by the core.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub cache: CacheConfig,
    pub llm: LlmConfig,
    pub evaluation: EvaluationConfig,
}

impl Config {
    const ENV_EMBEDDING_PROVIDER: &'static str = "EMBEDDING_PROVIDER";
    const ENV_EMBEDDING_ENDPOINT: &'static str = "EMBEDDING_ENDPOINT";
    const ENV_EMBEDDING_MODEL: &'static str = "EMBEDDING_MODEL";
    const ENV_EMBEDDING_SIMILARITY_THRESHOLD: &'static str = "EMBEDDING_SIMILARITY_THRESHOLD";
    const ENV_EMBEDDING_TIMEOUT_SECS: &'static str = "EMBEDDING_TIMEOUT_SECS";

    const ENV_CACHE_ANSWER_EVALUATION_TTL_SECS: &'static str = "CACHE_ANSWER_EVALUATION_TTL_SECS";
    const ENV_CACHE_EMBEDDING_TTL_SECS: &'static str = "CACHE_EMBEDDING_TTL_SECS";
    const ENV_CACHE_ANONYMOUS_RESULT_TTL_SECS: &'static str = "CACHE_ANONYMOUS_RESULT_TTL_SECS";
    const ENV_CACHE_REDIS_URL: &'static str = "CACHE_REDIS_URL";

    const ENV_LLM_ENDPOINT: &'static str = "LLM_ENDPOINT";
    const ENV_LLM_MODEL: &'static str = "LLM_MODEL";
    const ENV_LLM_TIMEOUT_SECS: &'static str = "LLM_TIMEOUT_SECS";

    const ENV_EVALUATION_CORRECTNESS_THRESHOLD: &'static str = "EVALUATION_CORRECTNESS_THRESHOLD";

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let embedding = EmbeddingConfig {
            provider: Self::parse_provider_from_env(defaults.embedding.provider)?,
            endpoint: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_ENDPOINT,
                defaults.embedding.endpoint,
            ),
            model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding.model,
            ),
            similarity_threshold: Self::parse_unit_f32_from_env(
                Self::ENV_EMBEDDING_SIMILARITY_THRESHOLD,
                defaults.embedding.similarity_threshold,
            )?,
            timeout: Self::parse_duration_secs_from_env(
                Self::ENV_EMBEDDING_TIMEOUT_SECS,
                defaults.embedding.timeout,
            ),
        };

        let cache = CacheConfig {
            answer_evaluation_ttl: Self::parse_duration_secs_from_env(
                Self::ENV_CACHE_ANSWER_EVALUATION_TTL_SECS,
                defaults.cache.answer_evaluation_ttl,
            ),
            embedding_ttl: Self::parse_duration_secs_from_env(
                Self::ENV_CACHE_EMBEDDING_TTL_SECS,
                defaults.cache.embedding_ttl,
            ),
            anonymous_result_ttl: Self::parse_duration_secs_from_env(
                Self::ENV_CACHE_ANONYMOUS_RESULT_TTL_SECS,
                defaults.cache.anonymous_result_ttl,
            ),
            redis_url: Self::parse_string_from_env(
                Self::ENV_CACHE_REDIS_URL,
                defaults.cache.redis_url,
            ),
        };

        let llm = LlmConfig {
            endpoint: Self::parse_string_from_env(Self::ENV_LLM_ENDPOINT, defaults.llm.endpoint),
            model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.llm.model),
            timeout: Self::parse_duration_secs_from_env(
                Self::ENV_LLM_TIMEOUT_SECS,
                defaults.llm.timeout,
            ),
        };

        let evaluation = EvaluationConfig {
            correctness_threshold: Self::parse_unit_f32_from_env(
                Self::ENV_EVALUATION_CORRECTNESS_THRESHOLD,
                defaults.evaluation.correctness_threshold,
            )?,
        };

        Ok(Self {
            embedding,
            cache,
            llm,
            evaluation,
        })
    }

    fn parse_provider_from_env(
        default: EmbeddingProviderKind,
    ) -> Result<EmbeddingProviderKind, ConfigError> {
        match env::var(Self::ENV_EMBEDDING_PROVIDER) {
            Ok(value) => value.parse(),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_duration_secs_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(default)
    }

    fn parse_unit_f32_from_env(var_name: &str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let parsed: f32 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidUnitFloat { value })?;
                if parsed > 0.0 && parsed <= 1.0 {
                    Ok(parsed)
                } else {
                    Err(ConfigError::InvalidUnitFloat {
                        value: parsed.to_string(),
                    })
                }
            }
            Err(_) => Ok(default),
        }
    }
}
