//! Filesystem-backed artifact store.

use super::service::{ArtifactError, ArtifactResult, ArtifactStore};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Stores rendered artifacts as `{root}/{code}.svg`.
///
/// Codes are `[a-z0-9_-]` by construction, so they are safe as file names
/// without further escaping. The directory doubles as the docroot for the
/// `/qr` route.
pub struct FsArtifactStore {
    root: PathBuf,
    public_base: String,
}

impl FsArtifactStore {
    /// Ensures the artifact directory exists and returns the store.
    ///
    /// `public_base` is the URL prefix written into artifact references,
    /// e.g. `https://sho.rt/qr`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Io`] when the directory cannot be created.
    pub async fn open(root: PathBuf, public_base: impl Into<String>) -> ArtifactResult<Self> {
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            ArtifactError::Io(format!("failed to create {}: {}", root.display(), e))
        })?;

        info!("Artifact store ready at {}", root.display());

        Ok(Self {
            root,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn file_name(short_code: &str) -> String {
        format!("{short_code}.svg")
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(&self, short_code: &str, bytes: &[u8]) -> ArtifactResult<String> {
        let path = self.root.join(Self::file_name(short_code));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ArtifactError::Io(format!("write {} failed: {}", path.display(), e)))?;

        debug!("Artifact stored: {}", path.display());

        Ok(format!("{}/{}", self.public_base, Self::file_name(short_code)))
    }

    async fn delete_many(&self, short_codes: &[String]) -> ArtifactResult<usize> {
        let mut removed = 0;

        for code in short_codes {
            let path = self.root.join(Self::file_name(code));
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("failed to delete artifact {}: {}", path.display(), e),
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path().to_path_buf(), "https://sho.rt/qr")
            .await
            .unwrap();

        let artifact_ref = store.put("abc1234", b"<svg/>").await.unwrap();

        assert_eq!(artifact_ref, "https://sho.rt/qr/abc1234.svg");
        let written = std::fs::read(dir.path().join("abc1234.svg")).unwrap();
        assert_eq!(written, b"<svg/>");
    }

    #[tokio::test]
    async fn test_delete_many_counts_only_present_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path().to_path_buf(), "/qr")
            .await
            .unwrap();

        store.put("aaa1111", b"one").await.unwrap();
        store.put("bbb2222", b"two").await.unwrap();

        let removed = store
            .delete_many(&[
                "aaa1111".to_string(),
                "bbb2222".to_string(),
                "missing0".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert!(!dir.path().join("aaa1111.svg").exists());
    }

    #[tokio::test]
    async fn test_public_base_trailing_slash_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::open(dir.path().to_path_buf(), "/qr/")
            .await
            .unwrap();

        let artifact_ref = store.put("abc1234", b"x").await.unwrap();
        assert_eq!(artifact_ref, "/qr/abc1234.svg");
    }
}
