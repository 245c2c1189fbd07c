//! Counter store trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Errors that can occur against the counter store.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("counter store connection error: {0}")]
    Connection(String),

    #[error("counter store operation error: {0}")]
    Operation(String),
}

/// Result type for counter operations.
pub type CounterResult<T> = Result<T, CounterError>;

/// Observation returned by a windowed increment.
#[derive(Debug, Clone, Copy)]
pub struct WindowHit {
    /// The counter value after this increment, 1-based within the window.
    pub count: u64,
    /// Time left until the window resets, when the store can report it.
    pub remaining: Option<Duration>,
}

/// Trait for per-client fixed-window counters.
///
/// The store is the system of record for the window: counters live outside
/// the process so every instance of the service shares them. Callers treat
/// any error as "store unavailable" and fail open.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increments the counter for `key`, attaching a TTL of `window` on the
    /// first hit, and reports the resulting count.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError`] when the store is unreachable or the
    /// operation fails; the caller decides what an error admits.
    async fn hit(&self, key: &str, window: Duration) -> CounterResult<WindowHit>;

    /// True when the backing store answers a ping.
    async fn health_check(&self) -> bool;
}
