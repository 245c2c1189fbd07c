//! Handler for short URL resolution.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Behavior
///
/// - Live link, browser caller: `302 Found` to the original URL.
/// - Live link, `Accept: application/json`: a JSON echo of the mapping
///   instead of a redirect.
/// - Unknown code: `404`. Expired code: `410`, always, even before the
///   sweeper has physically removed the record.
///
/// # Click Tracking
///
/// A click event is pushed onto a bounded channel for the background
/// worker; a full queue drops the event. The redirect never waits on the
/// counter write and never fails because of it.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let link = state.link_service.resolve_link(&code).await?;

    let _ = state.click_sender.try_send(ClickEvent::new(link.code.clone()));

    if wants_json(&headers) {
        let body = json!({
            "code": link.code,
            "original_url": link.original_url,
            "expires_at": link.expires_at,
        });
        return Ok((StatusCode::OK, Json(body)).into_response());
    }

    Ok((StatusCode::FOUND, [(header::LOCATION, link.original_url)]).into_response())
}

/// True when the caller signalled API intent.
fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
