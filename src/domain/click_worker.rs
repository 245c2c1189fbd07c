//! Background worker draining the click channel into the repository.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Processes click events until the channel closes.
///
/// Each increment is retried a few times with jittered backoff; an event
/// that still fails is dropped with a log line. Losing a click costs a
/// counter tick, never a redirect.
pub async fn run_click_worker(mut rx: mpsc::Receiver<ClickEvent>, repo: Arc<dyn LinkRepository>) {
    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(50).map(jitter).take(3);

        let attempt = Retry::spawn(strategy, || async {
            repo.increment_clicks(&event.code).await
        })
        .await;

        match attempt {
            Ok(()) => {
                metrics::counter!("snaplink_clicks_recorded_total").increment(1);
            }
            Err(e) => {
                warn!(code = %event.code, error = %e, "click increment dropped after retries");
                metrics::counter!("snaplink_clicks_dropped_total").increment(1);
            }
        }
    }

    debug!("click channel closed, worker exiting");
}
