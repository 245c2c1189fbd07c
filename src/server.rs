//! HTTP server initialization and runtime setup.
//!
//! Wires up the database pool, counter and artifact stores, background
//! workers, and the Axum server lifecycle.

use crate::application::services::{LinkService, RateLimiter};
use crate::config::Config;
use crate::domain::click_worker::run_click_worker;
use crate::domain::expiry_sweeper::run_expiry_sweeper;
use crate::infrastructure::artifacts::{
    ArtifactStore, FsArtifactStore, NullArtifactStore, SvgQrRenderer,
};
use crate::infrastructure::counter::{CounterStore, NullCounterStore, RedisCounterStore};
use crate::infrastructure::persistence::PgLinkRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis counter store (or NullCounterStore fallback)
/// - Filesystem artifact store (or NullArtifactStore when disabled)
/// - Background click worker and expiry sweeper
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if the database connection, migration run, artifact
/// directory creation, or server bind fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let counter_store: Arc<dyn CounterStore> = match &config.redis_url {
        Some(redis_url) => match RedisCounterStore::connect(redis_url).await {
            Ok(store) => {
                tracing::info!("Rate limiting enabled (Redis)");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Rate limiting disabled.", e);
                Arc::new(NullCounterStore::new())
            }
        },
        None => {
            tracing::info!("Rate limiting disabled (no counter store configured)");
            Arc::new(NullCounterStore::new())
        }
    };

    let base_url = config.base_url.trim_end_matches('/').to_string();

    let artifact_store: Arc<dyn ArtifactStore> = match &config.artifact_dir {
        Some(dir) => {
            let store = FsArtifactStore::open(dir.clone(), format!("{base_url}/qr"))
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            Arc::new(store)
        }
        None => {
            tracing::info!("Artifact generation disabled");
            Arc::new(NullArtifactStore::new())
        }
    };

    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));

    let link_service = Arc::new(LinkService::new(
        repo.clone(),
        artifact_store.clone(),
        Arc::new(SvgQrRenderer),
        base_url,
    ));

    let rate_limiter = Arc::new(RateLimiter::new(
        counter_store,
        config.rate_limit_per_window,
        Duration::from_secs(config.rate_limit_window_seconds),
    ));

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    tokio::spawn(run_click_worker(click_rx, repo.clone()));
    tracing::info!("Click worker started");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = tokio::spawn(run_expiry_sweeper(
        Duration::from_secs(config.sweep_interval_seconds),
        repo,
        artifact_store,
        shutdown_rx,
    ));
    tracing::info!(
        "Expiry sweeper started (interval: {}s)",
        config.sweep_interval_seconds
    );

    let state = AppState::new(link_service, rate_limiter, click_tx, config.behind_proxy);

    let app = app_router(state, config.artifact_dir.as_deref());

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // Signal the sweeper and wait for it; an in-flight sweep finishes its
    // current phase instead of being hard-killed mid-delete.
    let _ = shutdown_tx.send(true);
    let _ = sweeper.await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
