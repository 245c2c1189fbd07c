//! Handlers for the link creation endpoints.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::shorten::{
    BulkResultItem, BulkShortenRequest, BulkShortenResponse, ShortenRequest, ShortenResponse,
};
use crate::application::services::CreatedLink;
use crate::error::AppError;
use crate::state::AppState;
use validator::Validate;

/// Creates a shortened URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "custom_alias": "my-link",                      // optional
///   "expires_at": "2025-06-01T12:00:00",            // optional, with timezone
///   "timezone": "Europe/Berlin",                    // optional, default UTC
///   "relative_expiry": {"count": 2, "unit": "days"} // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the short URL, the artifact reference when one was
/// produced, and the resolved UTC expiry when one was requested.
///
/// # Errors
///
/// 4xx per the validation kind; 409 for a taken alias; 429 behind the
/// admission middleware; 500 for datastore failures on the critical path.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let created = process_single(&state, payload).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Creates shortened URLs for a batch of inputs.
///
/// # Endpoint
///
/// `POST /bulk-shorten`
///
/// # Batch Semantics
///
/// Items are processed independently and results are returned in input
/// order; one item's failure is captured in its slot and never aborts
/// siblings or the HTTP call. The response is always `207 Multi-Status`.
pub async fn bulk_shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<BulkShortenRequest>,
) -> Result<(StatusCode, Json<BulkShortenResponse>), AppError> {
    payload.validate().map_err(|e| AppError::InvalidUrl {
        reason: e.to_string(),
    })?;

    let mut results = Vec::with_capacity(payload.urls.len());

    for item in payload.urls {
        let result = match process_single(&state, item).await {
            Ok(created) => BulkResultItem::from_created(created),
            Err(err) => BulkResultItem::from_error(&err),
        };
        results.push(result);
    }

    Ok((StatusCode::MULTI_STATUS, Json(BulkShortenResponse { results })))
}

/// Shared single-item path: DTO conversion plus the creation sequence.
async fn process_single(
    state: &AppState,
    payload: ShortenRequest,
) -> Result<CreatedLink, AppError> {
    let request = payload.into_create_request()?;
    state.link_service.create_short_link(request).await
}
