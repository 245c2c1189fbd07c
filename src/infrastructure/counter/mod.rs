//! Counter store backing the fixed-window rate limiter.
//!
//! Provides a [`CounterStore`] trait with two implementations:
//! - [`RedisCounterStore`] - Production Redis-backed windowed counters
//! - [`NullCounterStore`] - No-op implementation when no store is configured

mod null_counter;
mod redis_counter;
mod service;

pub use null_counter::NullCounterStore;
pub use redis_counter::RedisCounterStore;
pub use service::{CounterError, CounterResult, CounterStore, WindowHit};

#[cfg(test)]
pub use service::MockCounterStore;
