//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the link lifecycle.
///
/// All operations are keyed by `code`, the natural unique key. The backing
/// store enforces code uniqueness; [`LinkRepository::create`] is the only
/// operation that can observe a violation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasTaken`] when the code lost a uniqueness race
    /// (the store's unique constraint fired), [`AppError::Internal`] on any
    /// other database error.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its (lower-cased) short code.
    ///
    /// Returns expired records as-is; expiry policy lives in the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Adds one to the click counter of a link.
    ///
    /// Counting on a missing code is a no-op, not an error: the record may
    /// have been swept between the lookup and the increment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Writes the side-artifact reference onto an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn set_qr_artifact(&self, code: &str, artifact_ref: &str) -> Result<(), AppError>;

    /// Lists records whose `expires_at` lies strictly before `cutoff`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_expired_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Link>, AppError>;

    /// Deletes the records with the given codes, returning how many went.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_codes(&self, codes: &[String]) -> Result<u64, AppError>;

    /// True when the backing store answers a trivial query.
    async fn health_check(&self) -> bool;
}
