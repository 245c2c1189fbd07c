//! Router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`      - Create a short link (rate limited)
//! - `POST /bulk-shorten` - Create a batch of short links (rate limited)
//! - `GET  /stats/{code}` - Record view for a code
//! - `GET  /{code}`       - Redirect (or JSON echo on API intent)
//! - `GET  /health`       - Component health checks
//! - `/qr/*`              - Rendered QR artifacts, when the store is
//!   filesystem-backed

use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    bulk_shorten_handler, health_handler, redirect_handler, shorten_handler, stats_handler,
};
use crate::api::middleware::rate_limit;
use crate::state::AppState;

/// Routes with state applied; shared between the server and HTTP tests.
///
/// The admission middleware guards only the creation endpoints: lookups
/// must stay cheap and a redirect storm is the datastore's problem, not
/// the limiter's.
pub fn api_router(state: AppState) -> Router {
    let creation_routes = Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/bulk-shorten", post(bulk_shorten_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::admission_layer,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/{code}", get(redirect_handler))
        .merge(creation_routes)
        .with_state(state)
}

/// Full application router with tracing, artifact serving, and
/// trailing-slash normalization.
pub fn app_router(state: AppState, artifact_dir: Option<&Path>) -> NormalizePath<Router> {
    let mut router = api_router(state);

    if let Some(dir) = artifact_dir {
        router = router.nest_service("/qr", ServeDir::new(dir));
    }

    let router = router.layer(TraceLayer::new_for_http());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
