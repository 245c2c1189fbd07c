//! Handler for per-link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::LinkStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the record behind a short code.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// # Errors
///
/// `404` for an unknown code, `410` for an expired one — an expired record
/// is gone on every read path, not just the redirect.
pub async fn stats_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkStatsResponse>, AppError> {
    let link = state.link_service.resolve_link(&code).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkStatsResponse::from_link(link, short_url)))
}
