//! In-memory [`KvCache`] used by tests and the `mock` feature.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::kv::{CacheError, KvCache};

enum StoredValue {
    Plain(Vec<u8>),
    Hash(HashMap<String, Vec<u8>>),
}

struct Entry {
    value: StoredValue,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// `tokio::sync::RwLock<HashMap<..>>`-backed [`KvCache`], grounded on the
/// pack's `InMemoryCacheBackend` pattern.
#[derive(Default)]
pub struct InMemoryKvCache {
    store: RwLock<HashMap<String, Entry>>,
}

impl InMemoryKvCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvCache for InMemoryKvCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        let mut store = self.store.write().await;
        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                store.remove(key);
                Err(CacheError::Miss)
            }
            Some(Entry {
                value: StoredValue::Plain(bytes),
                ..
            }) => Ok(bytes.clone()),
            Some(Entry {
                value: StoredValue::Hash(_),
                ..
            }) => Err(CacheError::Unavailable {
                reason: format!("key '{key}' holds a hash, not a plain value"),
            }),
            None => Err(CacheError::Miss),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.store.write().await.insert(
            key.to_string(),
            Entry {
                value: StoredValue::Plain(value),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, Vec<u8>>, CacheError> {
        let mut store = self.store.write().await;
        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                store.remove(key);
                Ok(HashMap::new())
            }
            Some(Entry {
                value: StoredValue::Hash(fields),
                ..
            }) => Ok(fields.clone()),
            Some(Entry {
                value: StoredValue::Plain(_),
                ..
            }) => Err(CacheError::Unavailable {
                reason: format!("key '{key}' holds a plain value, not a hash"),
            }),
            None => Ok(HashMap::new()),
        }
    }

    async fn hset(&self, key: &str, field: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        match store.get_mut(key) {
            Some(entry) if entry.is_expired() => {
                let mut fields = HashMap::new();
                fields.insert(field.to_string(), value);
                *entry = Entry {
                    value: StoredValue::Hash(fields),
                    expires_at: None,
                };
            }
            Some(Entry {
                value: StoredValue::Hash(fields),
                ..
            }) => {
                fields.insert(field.to_string(), value);
            }
            Some(Entry {
                value: StoredValue::Plain(_),
                ..
            }) => {
                return Err(CacheError::Unavailable {
                    reason: format!("key '{key}' holds a plain value, not a hash"),
                });
            }
            None => {
                let mut fields = HashMap::new();
                fields.insert(field.to_string(), value);
                store.insert(
                    key.to_string(),
                    Entry {
                        value: StoredValue::Hash(fields),
                        expires_at: None,
                    },
                );
            }
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        if let Some(entry) = self.store.write().await.get_mut(key) {
            entry.expires_at = Some(Instant::now() + ttl);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
