//! No-op counter store for disabled rate limiting.

use super::service::{CounterResult, CounterStore, WindowHit};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A counter store that counts nothing.
///
/// Used when no Redis counter store is configured or the connection fails
/// at startup. Every hit reports a zero count, so the limiter in front of
/// it admits every request.
pub struct NullCounterStore;

impl NullCounterStore {
    /// Creates a new NullCounterStore instance.
    pub fn new() -> Self {
        debug!("Using NullCounterStore (rate limiting disabled)");
        Self
    }
}

impl Default for NullCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for NullCounterStore {
    async fn hit(&self, _key: &str, _window: Duration) -> CounterResult<WindowHit> {
        Ok(WindowHit {
            count: 0,
            remaining: None,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}
