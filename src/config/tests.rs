use super::*;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_core_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("EMBEDDING_PROVIDER");
        env::remove_var("EMBEDDING_ENDPOINT");
        env::remove_var("EMBEDDING_MODEL");
        env::remove_var("EMBEDDING_SIMILARITY_THRESHOLD");
        env::remove_var("CACHE_ANSWER_EVALUATION_TTL_SECS");
        env::remove_var("CACHE_EMBEDDING_TTL_SECS");
        env::remove_var("CACHE_ANONYMOUS_RESULT_TTL_SECS");
        env::remove_var("CACHE_REDIS_URL");
        env::remove_var("LLM_ENDPOINT");
        env::remove_var("LLM_MODEL");
        env::remove_var("LLM_TIMEOUT_SECS");
        env::remove_var("EMBEDDING_TIMEOUT_SECS");
        env::remove_var("EVALUATION_CORRECTNESS_THRESHOLD");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.embedding.provider, EmbeddingProviderKind::Ollama);
    assert_eq!(config.embedding.endpoint, "http://localhost:11434");
    assert_eq!(config.embedding.model, "nomic-embed-text");
    assert_eq!(config.cache.redis_url, "redis://127.0.0.1:6379");
    assert_eq!(config.llm.model, "llama3");
    assert_eq!(config.evaluation.correctness_threshold, 0.7);
}

#[test]
fn test_provider_from_str_accepts_known_values_case_insensitively() {
    assert_eq!(
        "Ollama".parse::<EmbeddingProviderKind>().unwrap(),
        EmbeddingProviderKind::Ollama
    );
    assert_eq!(
        "OPENAI".parse::<EmbeddingProviderKind>().unwrap(),
        EmbeddingProviderKind::OpenAi
    );
}

#[test]
fn test_provider_from_str_rejects_unknown_value() {
    let err = "bedrock".parse::<EmbeddingProviderKind>().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidProvider { .. }));
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_core_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.embedding.provider, EmbeddingProviderKind::Ollama);
    assert_eq!(config.llm.endpoint, "http://localhost:11434/v1/chat/completions");
}

#[test]
#[serial]
fn test_from_env_custom_provider() {
    clear_core_env();

    with_env_vars(&[("EMBEDDING_PROVIDER", "openai")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::OpenAi);
    });
}

#[test]
#[serial]
fn test_from_env_invalid_provider() {
    clear_core_env();

    with_env_vars(&[("EMBEDDING_PROVIDER", "not_a_provider")], || {
        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidProvider { .. }
        ));
    });
}

#[test]
#[serial]
fn test_from_env_custom_endpoint_and_model() {
    clear_core_env();

    with_env_vars(
        &[
            ("EMBEDDING_ENDPOINT", "http://embeddings.internal:9000"),
            ("EMBEDDING_MODEL", "bge-small"),
            ("LLM_ENDPOINT", "http://llm.internal/v1/chat/completions"),
            ("LLM_MODEL", "mixtral"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.embedding.endpoint, "http://embeddings.internal:9000");
            assert_eq!(config.embedding.model, "bge-small");
            assert_eq!(config.llm.endpoint, "http://llm.internal/v1/chat/completions");
            assert_eq!(config.llm.model, "mixtral");
        },
    );
}

#[test]
#[serial]
fn test_from_env_custom_ttls() {
    clear_core_env();

    with_env_vars(
        &[
            ("CACHE_ANSWER_EVALUATION_TTL_SECS", "3600"),
            ("CACHE_EMBEDDING_TTL_SECS", "172800"),
            ("CACHE_ANONYMOUS_RESULT_TTL_SECS", "60"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(
                config.cache.answer_evaluation_ttl,
                std::time::Duration::from_secs(3600)
            );
            assert_eq!(
                config.cache.embedding_ttl,
                std::time::Duration::from_secs(172_800)
            );
            assert_eq!(
                config.cache.anonymous_result_ttl,
                std::time::Duration::from_secs(60)
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_ttl_falls_back_to_default() {
    clear_core_env();

    with_env_vars(&[("CACHE_EMBEDDING_TTL_SECS", "not_a_number")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.cache.embedding_ttl, crate::constants::DEFAULT_EMBEDDING_TTL);
    });
}

#[test]
#[serial]
fn test_from_env_custom_similarity_threshold() {
    clear_core_env();

    with_env_vars(&[("EMBEDDING_SIMILARITY_THRESHOLD", "0.95")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.embedding.similarity_threshold, 0.95);
    });
}

#[test]
#[serial]
fn test_from_env_similarity_threshold_out_of_range_is_error() {
    clear_core_env();

    with_env_vars(&[("EMBEDDING_SIMILARITY_THRESHOLD", "1.5")], || {
        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidUnitFloat { .. }
        ));
    });
}

#[test]
#[serial]
fn test_from_env_similarity_threshold_zero_is_error() {
    clear_core_env();

    with_env_vars(&[("EMBEDDING_SIMILARITY_THRESHOLD", "0")], || {
        let result = Config::from_env();
        assert!(result.is_err());
    });
}

#[test]
#[serial]
fn test_from_env_custom_embedding_timeout() {
    clear_core_env();

    with_env_vars(&[("EMBEDDING_TIMEOUT_SECS", "45")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.embedding.timeout, std::time::Duration::from_secs(45));
    });
}

#[test]
#[serial]
fn test_from_env_correctness_threshold_not_a_number_is_error() {
    clear_core_env();

    with_env_vars(&[("EVALUATION_CORRECTNESS_THRESHOLD", "high")], || {
        let result = Config::from_env();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidUnitFloat { .. }
        ));
    });
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_core_env();

    with_env_vars(
        &[
            ("EMBEDDING_PROVIDER", "openai"),
            ("EMBEDDING_ENDPOINT", "https://api.openai.com/v1"),
            ("EMBEDDING_MODEL", "text-embedding-3-small"),
            ("EMBEDDING_SIMILARITY_THRESHOLD", "0.92"),
            ("CACHE_REDIS_URL", "redis://cache.internal:6379"),
            ("LLM_ENDPOINT", "http://llm.internal/v1/chat/completions"),
            ("LLM_MODEL", "llama3"),
            ("EVALUATION_CORRECTNESS_THRESHOLD", "0.8"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.embedding.provider, EmbeddingProviderKind::OpenAi);
            assert_eq!(config.embedding.endpoint, "https://api.openai.com/v1");
            assert_eq!(config.embedding.model, "text-embedding-3-small");
            assert_eq!(config.embedding.similarity_threshold, 0.92);
            assert_eq!(config.cache.redis_url, "redis://cache.internal:6379");
            assert_eq!(config.llm.endpoint, "http://llm.internal/v1/chat/completions");
            assert_eq!(config.evaluation.correctness_threshold, 0.8);
        },
    );
}

#[test]
fn test_key_segment_matches_provider() {
    assert_eq!(EmbeddingProviderKind::Ollama.as_key_segment(), "ollama");
    assert_eq!(EmbeddingProviderKind::OpenAi.as_key_segment(), "openai");
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::InvalidProvider {
        value: "bedrock".to_string(),
    };
    assert!(err.to_string().contains("bedrock"));

    let err = ConfigError::InvalidUnitFloat {
        value: "1.5".to_string(),
    };
    assert!(err.to_string().contains("1.5"));
}
