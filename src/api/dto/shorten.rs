//! DTOs for the link creation endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateLinkRequest, CreatedLink};
use crate::error::AppError;
use crate::utils::expiry::{ExpirySpec, RelativeExpiry};

/// Request to shorten a single URL.
///
/// Expiry intent is optional and takes one of two forms: an absolute local
/// timestamp (`expires_at` + `timezone`) or a relative duration
/// (`relative_expiry`). Supplying both is rejected.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten; a missing scheme defaults to `https://`.
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,

    /// Optional caller-chosen short code.
    pub custom_alias: Option<String>,

    /// Optional absolute expiry as naive local time, e.g. `2025-06-01T12:00:00`.
    pub expires_at: Option<String>,

    /// IANA zone the absolute expiry is expressed in (default `UTC`).
    pub timezone: Option<String>,

    /// Optional relative expiry, e.g. `{"count": 2, "unit": "days"}`.
    pub relative_expiry: Option<RelativeExpiry>,
}

impl ShortenRequest {
    /// Converts the transport shape into the service input.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidUrl`] when the DTO validation fails,
    /// [`AppError::InvalidExpiry`] when the expiry fields are ambiguous.
    pub fn into_create_request(self) -> Result<CreateLinkRequest, AppError> {
        self.validate().map_err(|e| AppError::InvalidUrl {
            reason: e.to_string(),
        })?;

        let expiry = ExpirySpec::from_parts(self.expires_at, self.timezone, self.relative_expiry)?;

        Ok(CreateLinkRequest {
            original_url: self.original_url,
            custom_alias: self.custom_alias,
            expiry,
        })
    }
}

/// Request to shorten several URLs in one call.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkShortenRequest {
    /// Items are processed independently; one failure never aborts siblings,
    /// so no nested validation happens at the batch level.
    #[validate(length(min = 1, max = 100, message = "provide 1-100 URLs"))]
    pub urls: Vec<ShortenRequest>,
}

/// Response for a single successful creation.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_artifact_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_utc: Option<DateTime<Utc>>,
}

impl From<CreatedLink> for ShortenResponse {
    fn from(created: CreatedLink) -> Self {
        Self {
            code: created.link.code,
            short_url: created.short_url,
            qr_artifact_ref: created.qr_artifact_ref,
            expires_at_utc: created.link.expires_at,
        }
    }
}

/// Response for bulk creation: one result per input, in input order.
#[derive(Debug, Serialize)]
pub struct BulkShortenResponse {
    pub results: Vec<BulkResultItem>,
}

/// Per-item outcome of a bulk creation.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BulkResultItem {
    Success {
        success: bool,
        code: String,
        short_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        qr_artifact_ref: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        expires_at_utc: Option<DateTime<Utc>>,
    },
    Error {
        success: bool,
        error: String,
        error_code: u16,
    },
}

impl BulkResultItem {
    pub fn from_created(created: CreatedLink) -> Self {
        Self::Success {
            success: true,
            code: created.link.code,
            short_url: created.short_url,
            qr_artifact_ref: created.qr_artifact_ref,
            expires_at_utc: created.link.expires_at,
        }
    }

    pub fn from_error(err: &AppError) -> Self {
        Self::Error {
            success: false,
            error: err.error_info().message,
            error_code: err.status().as_u16(),
        }
    }
}
