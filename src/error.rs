//! Application error taxonomy and HTTP mapping.
//!
//! Every failure the service can report to a caller is one of the closed set
//! of kinds below. Validation kinds map to 4xx responses with the
//! human-readable reason; infrastructure failures collapse into
//! [`AppError::Internal`] and surface as a generic 500 (the source is logged,
//! never echoed to the caller).

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Wire shape of an error response: `{"error": {code, message, details}}`.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error descriptor embedded in error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Invalid expiry: {reason}")]
    InvalidExpiry { reason: String },

    #[error("Expiry must be strictly in the future")]
    ExpiryNotFuture,

    #[error("Expiry must lie between 1 hour and 3 months from now")]
    ExpiryOutOfBounds,

    #[error("Alias must be 3-30 characters of letters, digits, '_' or '-'")]
    InvalidAliasFormat { alias: String },

    #[error("Alias '{alias}' is reserved")]
    ReservedAlias { alias: String },

    #[error("Alias '{alias}' is already taken")]
    AliasTaken { alias: String },

    #[error("Could not allocate a unique short code")]
    SlugExhausted,

    #[error("Too many requests, retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Short link '{code}' not found")]
    NotFound { code: String },

    #[error("Short link '{code}' has expired")]
    Expired { code: String },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. }
            | Self::InvalidExpiry { .. }
            | Self::ExpiryNotFuture
            | Self::ExpiryOutOfBounds
            | Self::InvalidAliasFormat { .. }
            | Self::ReservedAlias { .. } => StatusCode::BAD_REQUEST,
            Self::AliasTaken { .. } => StatusCode::CONFLICT,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Expired { .. } => StatusCode::GONE,
            Self::SlugExhausted | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidExpiry { .. } => "invalid_expiry",
            Self::ExpiryNotFuture => "expiry_not_future",
            Self::ExpiryOutOfBounds => "expiry_out_of_bounds",
            Self::InvalidAliasFormat { .. } => "invalid_alias_format",
            Self::ReservedAlias { .. } => "reserved_alias",
            Self::AliasTaken { .. } => "alias_taken",
            Self::SlugExhausted => "slug_exhausted",
            Self::RateLimited { .. } => "rate_limited",
            Self::NotFound { .. } => "not_found",
            Self::Expired { .. } => "expired",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Builds the wire descriptor, including structured fields per kind.
    pub fn error_info(&self) -> ErrorInfo {
        let details = match self {
            Self::InvalidAliasFormat { alias }
            | Self::ReservedAlias { alias }
            | Self::AliasTaken { alias } => json!({ "alias": alias }),
            Self::RateLimited {
                retry_after_seconds,
            } => json!({ "retry_after_seconds": retry_after_seconds }),
            Self::NotFound { code } | Self::Expired { code } => json!({ "code": code }),
            _ => json!({}),
        };

        let message = match self {
            // Never leak infrastructure details to the caller.
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Internal(source) = &self {
            tracing::error!(error = %source, "request failed with internal error");
        }

        let status = self.status();
        let body = ErrorBody {
            error: self.error_info(),
        };

        if let Self::RateLimited {
            retry_after_seconds,
        } = &self
        {
            let headers = [(header::RETRY_AFTER, retry_after_seconds.to_string())];
            return (status, headers, Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(anyhow::Error::new(e))
    }
}
