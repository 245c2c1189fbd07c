//! Handler for the health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: all components healthy (`status: "ok"`)
/// - **503 Service Unavailable**: one or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: trivial repository query
/// 2. **Click queue**: channel open, with reported capacity
/// 3. **Counter store**: ping (a disabled store reports healthy; the
///    limiter in front of it fails open anyway)
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = if state.link_service.health_check().await {
        CheckStatus::ok("connected")
    } else {
        CheckStatus::error("database unreachable")
    };

    let click_queue = if state.click_sender.is_closed() {
        CheckStatus::error("click queue is closed")
    } else {
        CheckStatus::ok(format!("capacity: {}", state.click_sender.capacity()))
    };

    let counter_store = if state.rate_limiter.health_check().await {
        CheckStatus::ok("reachable")
    } else {
        CheckStatus::error("counter store unreachable")
    };

    let all_healthy = database.status == "ok"
        && click_queue.status == "ok"
        && counter_store.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            click_queue,
            counter_store,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
