//! DTO for the per-link stats endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Public view of a link record.
#[derive(Debug, Serialize)]
pub struct LinkStatsResponse {
    pub code: String,
    pub original_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_artifact_ref: Option<String>,
}

impl LinkStatsResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            code: link.code,
            original_url: link.original_url,
            short_url,
            clicks: link.clicks,
            created_at: link.created_at,
            expires_at: link.expires_at,
            qr_artifact_ref: link.qr_artifact_ref,
        }
    }
}
