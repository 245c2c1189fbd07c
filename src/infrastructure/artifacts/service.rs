//! Artifact store trait and error types.

use async_trait::async_trait;

/// Errors that can occur against the artifact store.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact store disabled")]
    Disabled,

    #[error("artifact render failed: {0}")]
    Render(String),

    #[error("artifact I/O error: {0}")]
    Io(String),
}

/// Result type for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Blob-store namespace of rendered artifacts, keyed by short code.
///
/// Artifacts are referenced only by their owning record, so implementations
/// may treat deletion of an absent entry as success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Stores rendered bytes for a code and returns the public reference
    /// the record should carry.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] when the write fails or the store is
    /// disabled. Callers treat the failure as a degraded creation, never a
    /// failed one.
    async fn put(&self, short_code: &str, bytes: &[u8]) -> ArtifactResult<String>;

    /// Deletes the artifacts for the given codes, returning how many were
    /// actually removed. Absent entries are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError`] only when the store itself is unreachable.
    async fn delete_many(&self, short_codes: &[String]) -> ArtifactResult<usize>;
}
