//! Production [`KvCache`] backed by Redis.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::kv::{CacheError, KvCache};

/// `redis::aio::ConnectionManager`-backed [`KvCache`].
///
/// The connection manager reconnects transparently on transport errors, so
/// this adapter holds a single cloneable handle rather than a pool.
pub struct RedisKvCache {
    conn: ConnectionManager,
}

impl RedisKvCache {
    /// Connects to `redis_url` and returns a ready-to-use cache handle.
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url).map_err(|e| CacheError::Unavailable {
            reason: e.to_string(),
        })?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(Self { conn })
    }
}

fn unavailable(err: redis::RedisError) -> CacheError {
    CacheError::Unavailable {
        reason: err.to_string(),
    }
}

#[async_trait]
impl KvCache for RedisKvCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(unavailable)?;
        value.ok_or(CacheError::Miss)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(key, value, seconds)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(key).await.map_err(unavailable)?;
        Ok(())
    }

    async fn hget_all(&self, key: &str) -> Result<HashMap<String, Vec<u8>>, CacheError> {
        let mut conn = self.conn.clone();
        let fields: HashMap<String, Vec<u8>> = conn.hgetall(key).await.map_err(unavailable)?;
        Ok(fields)
    }

    async fn hset(&self, key: &str, field: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.hset(key, field, value).await.map_err(unavailable)?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let seconds = ttl.as_secs().max(1) as i64;
        let _: bool = conn.expire(key, seconds).await.map_err(unavailable)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
