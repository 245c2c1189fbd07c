//! No-op artifact store for disabled artifact generation.

use super::service::{ArtifactError, ArtifactResult, ArtifactStore};
use async_trait::async_trait;
use tracing::debug;

/// An artifact store that stores nothing.
///
/// `put` reports [`ArtifactError::Disabled`] so records honestly keep a
/// null artifact reference instead of pointing at a blob that was never
/// written; the sweeper's deletions trivially succeed.
pub struct NullArtifactStore;

impl NullArtifactStore {
    /// Creates a new NullArtifactStore instance.
    pub fn new() -> Self {
        debug!("Using NullArtifactStore (artifact generation disabled)");
        Self
    }
}

impl Default for NullArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for NullArtifactStore {
    async fn put(&self, _short_code: &str, _bytes: &[u8]) -> ArtifactResult<String> {
        Err(ArtifactError::Disabled)
    }

    async fn delete_many(&self, _short_codes: &[String]) -> ArtifactResult<usize> {
        Ok(0)
    }
}
