//! Redis-backed windowed counter implementation.

use super::service::{CounterError, CounterResult, CounterStore, WindowHit};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::info;

/// Redis counter store for distributed rate limiting.
///
/// Uses `INCR` plus a window-length `EXPIRE` set on the first hit. Uses
/// connection pooling via `ConnectionManager` for efficient connection
/// reuse.
pub struct RedisCounterStore {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCounterStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CounterResult<Self> {
        info!("Connecting to Redis counter store");

        let client = Client::open(redis_url).map_err(|e| {
            CounterError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CounterError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CounterError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "rl:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn hit(&self, key: &str, window: Duration) -> CounterResult<WindowHit> {
        let key = self.build_key(key);
        let mut conn = self.client.clone();
        let window_secs = window.as_secs().max(1) as i64;

        let count: u64 = conn
            .incr(&key, 1u64)
            .await
            .map_err(|e| CounterError::Operation(format!("INCR failed: {}", e)))?;

        let mut ttl: i64 = conn
            .ttl(&key)
            .await
            .map_err(|e| CounterError::Operation(format!("TTL failed: {}", e)))?;

        // First hit in the window, or a counter that lost its expiry.
        if ttl < 0 {
            let _: i64 = conn
                .expire(&key, window_secs)
                .await
                .map_err(|e| CounterError::Operation(format!("EXPIRE failed: {}", e)))?;
            ttl = window_secs;
        }

        Ok(WindowHit {
            count,
            remaining: Some(Duration::from_secs(ttl as u64)),
        })
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
