//! Recurring reclamation of expired records and their side-artifacts.
//!
//! The sweep is two-phase: artifacts first, records second. A failed
//! artifact deletion leaves an orphaned blob, which costs storage and
//! nothing else; a record that outlives its expiry is a correctness
//! violation, so record deletion proceeds regardless of phase one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::artifacts::ArtifactStore;

/// Result of a single sweep pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Records whose expiry had passed at snapshot time.
    pub matched: usize,
    /// Side-artifacts removed from the blob store.
    pub artifacts_deleted: usize,
    /// Records removed from the repository.
    pub records_deleted: u64,
}

/// Runs the sweeper until shutdown is signalled.
///
/// A single task owns the loop, so runs are serialized by construction; a
/// sweep that overruns the interval delays the next tick instead of racing
/// it. Shutdown is only observed between sweeps, which lets an in-flight
/// sweep finish its current phase.
pub async fn run_expiry_sweeper(
    interval: Duration,
    repo: Arc<dyn LinkRepository>,
    artifacts: Arc<dyn ArtifactStore>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match sweep_once(repo.as_ref(), artifacts.as_ref()).await {
                    Ok(outcome) if outcome.matched > 0 => {
                        info!(
                            matched = outcome.matched,
                            artifacts_deleted = outcome.artifacts_deleted,
                            records_deleted = outcome.records_deleted,
                            "sweep reclaimed expired links"
                        );
                    }
                    Ok(_) => debug!("sweep found nothing to reclaim"),
                    Err(e) => warn!(error = %e, "sweep failed, retrying on next tick"),
                }
            }
            _ = shutdown.changed() => {
                info!("expiry sweeper shutting down");
                break;
            }
        }
    }
}

/// One sweep pass over the current snapshot of expired records.
///
/// # Errors
///
/// Only the initial snapshot query propagates an error; both deletion
/// phases degrade to logging so a partial failure never aborts the sweep.
pub async fn sweep_once(
    repo: &dyn LinkRepository,
    artifacts: &dyn ArtifactStore,
) -> Result<SweepOutcome, AppError> {
    let expired = repo.list_expired_before(Utc::now()).await?;
    if expired.is_empty() {
        return Ok(SweepOutcome::default());
    }

    let with_artifacts: Vec<String> = expired
        .iter()
        .filter(|link| link.qr_artifact_ref.is_some())
        .map(|link| link.code.clone())
        .collect();

    let mut artifacts_deleted = 0;
    if !with_artifacts.is_empty() {
        match artifacts.delete_many(&with_artifacts).await {
            Ok(removed) => artifacts_deleted = removed,
            // Orphaned blobs are an acceptable, self-correcting leak.
            Err(e) => warn!(error = %e, "artifact cleanup failed, records will still be removed"),
        }
    }

    let codes: Vec<String> = expired.iter().map(|link| link.code.clone()).collect();
    let records_deleted = match repo.delete_by_codes(&codes).await {
        Ok(deleted) => deleted,
        Err(e) => {
            warn!(error = %e, "record deletion failed, records remain until next sweep");
            0
        }
    };

    metrics::counter!("snaplink_swept_records_total").increment(records_deleted);

    Ok(SweepOutcome {
        matched: expired.len(),
        artifacts_deleted,
        records_deleted,
    })
}
