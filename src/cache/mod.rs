//! Cache layer: the Vector KV Cache abstraction plus the two caches built on
//! top of it (similarity answer cache, anonymous result cache).

pub mod anonymous;
pub mod codec;
pub mod kv;
pub mod memory_kv;
pub mod noop;
pub mod redis_kv;
pub mod similarity;
pub mod types;

pub use anonymous::{AnonymousCacheError, AnonymousResultCache};
pub use kv::{CacheError, KvCache};
pub use memory_kv::InMemoryKvCache;
pub use noop::NoopKvCache;
pub use redis_kv::RedisKvCache;
pub use similarity::{SimilarityAnswerCache, SimilarityCacheError, cosine_similarity};
pub use types::CachedEvaluation;
