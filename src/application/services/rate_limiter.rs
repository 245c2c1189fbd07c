//! Admission control for the creation endpoints.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::error::AppError;
use crate::infrastructure::counter::CounterStore;

/// Fixed-window rate limiter keyed by client identity.
///
/// A counter per client is incremented on every request; the first hit in a
/// window attaches a TTL equal to the window length, and any hit beyond the
/// threshold is rejected with the remaining window as a retry hint.
///
/// This is a coarse fixed-window gate: a client can burst up to twice the
/// threshold across a window boundary. Good enough for abuse deterrence,
/// not for billing-grade accounting.
///
/// When the counter store errors the request is admitted and the failure
/// logged; an infrastructure outage must never block legitimate traffic.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    limit: u64,
    window: Duration,
}

impl RateLimiter {
    /// Creates a limiter admitting `limit` requests per `window`.
    pub fn new(store: Arc<dyn CounterStore>, limit: u64, window: Duration) -> Self {
        Self {
            store,
            limit,
            window,
        }
    }

    /// Admits or rejects one request from `client_key`.
    ///
    /// # Errors
    ///
    /// [`AppError::RateLimited`] with a retry-after hint when the client
    /// exceeded the window threshold. Counter-store failures never surface:
    /// the request is admitted (fail-open).
    pub async fn admit(&self, client_key: &str) -> Result<(), AppError> {
        let hit = match self.store.hit(client_key, self.window).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "counter store unavailable, admitting request");
                return Ok(());
            }
        };

        if hit.count > self.limit {
            let retry_after_seconds = hit.remaining.unwrap_or(self.window).as_secs().max(1);
            metrics::counter!("snaplink_rate_limited_total").increment(1);
            return Err(AppError::RateLimited {
                retry_after_seconds,
            });
        }

        Ok(())
    }

    /// True when the backing counter store answers a ping.
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}
