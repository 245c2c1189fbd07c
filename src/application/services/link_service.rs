//! Link creation and retrieval service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::artifacts::{ArtifactError, ArtifactStore, QrRenderer};
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code, validate_custom_alias};
use crate::utils::expiry::{ExpirySpec, compute_expiry};
use crate::utils::url_normalizer::normalize_url;

/// Existence-check attempts before generated-code allocation gives up.
///
/// Exhausting this budget means the keyspace is misconfigured relative to
/// the collision rate; the request fails rather than looping forever.
const GENERATE_ATTEMPTS: usize = 5;

/// Input for a single creation request, already parsed from the transport.
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    pub original_url: String,
    pub custom_alias: Option<String>,
    pub expiry: ExpirySpec,
}

/// Result of a successful creation.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub short_url: String,
    /// Absent when rendering or storing the artifact failed; the creation
    /// itself still succeeded.
    pub qr_artifact_ref: Option<String>,
}

/// Service composing validation, expiry computation, code resolution,
/// persistence, and best-effort side-artifact generation.
///
/// All collaborators are injected handles so tests can substitute fakes.
pub struct LinkService {
    repo: Arc<dyn LinkRepository>,
    artifacts: Arc<dyn ArtifactStore>,
    qr: Arc<dyn QrRenderer>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public prefix of short URLs, e.g. `https://sho.rt`.
    pub fn new(
        repo: Arc<dyn LinkRepository>,
        artifacts: Arc<dyn ArtifactStore>,
        qr: Arc<dyn QrRenderer>,
        base_url: String,
    ) -> Self {
        Self {
            repo,
            artifacts,
            qr,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Runs the end-to-end creation sequence for one request.
    ///
    /// 1. Normalize and validate the URL.
    /// 2. Resolve the expiry intent to a UTC instant.
    /// 3. Resolve a unique code (custom or generated).
    /// 4. Insert; a lost uniqueness race is retried once for generated
    ///    codes and surfaced as [`AppError::AliasTaken`] for custom ones.
    /// 5. Best-effort: render the QR artifact, store it, patch the record.
    ///
    /// # Errors
    ///
    /// Validation kinds per the steps above; [`AppError::SlugExhausted`]
    /// when the attempt budget runs out; [`AppError::Internal`] for
    /// failures on the critical path.
    pub async fn create_short_link(&self, req: CreateLinkRequest) -> Result<CreatedLink, AppError> {
        let original_url = normalize_url(&req.original_url).map_err(|e| AppError::InvalidUrl {
            reason: e.to_string(),
        })?;

        let expires_at = compute_expiry(&req.expiry, Utc::now())?;

        let link = match req.custom_alias {
            Some(alias) => {
                validate_custom_alias(&alias)?;
                let code = alias.to_ascii_lowercase();

                if self.repo.find_by_code(&code).await?.is_some() {
                    return Err(AppError::AliasTaken { alias: code });
                }

                // The unique constraint stays the arbiter if another writer
                // takes the code between the check and this insert.
                self.repo
                    .create(NewLink {
                        code,
                        original_url,
                        expires_at,
                    })
                    .await?
            }
            None => {
                self.insert_with_generated_code(original_url, expires_at)
                    .await?
            }
        };

        let short_url = self.short_url(&link.code);
        let qr_artifact_ref = self.attach_qr_artifact(&link.code, &short_url).await;

        Ok(CreatedLink {
            link,
            short_url,
            qr_artifact_ref,
        })
    }

    /// Looks up a live link by code.
    ///
    /// An expired record is logically dead even before the sweeper removes
    /// it, so it resolves to [`AppError::Expired`], never a redirect.
    ///
    /// # Errors
    ///
    /// [`AppError::NotFound`], [`AppError::Expired`], or
    /// [`AppError::Internal`].
    pub async fn resolve_link(&self, code: &str) -> Result<Link, AppError> {
        let code = code.to_ascii_lowercase();

        let link = self
            .repo
            .find_by_code(&code)
            .await?
            .ok_or(AppError::NotFound { code: code.clone() })?;

        if link.is_expired() {
            return Err(AppError::Expired { code });
        }

        Ok(link)
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// True when the repository answers a trivial query.
    pub async fn health_check(&self) -> bool {
        self.repo.health_check().await
    }

    /// Allocates and inserts a generated code, absorbing one lost race.
    async fn insert_with_generated_code(
        &self,
        original_url: String,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) -> Result<Link, AppError> {
        let code = self.reserve_code().await?;

        match self
            .repo
            .create(NewLink {
                code,
                original_url: original_url.clone(),
                expires_at,
            })
            .await
        {
            Ok(link) => Ok(link),
            Err(AppError::AliasTaken { alias }) => {
                debug!(code = %alias, "generated code lost an insert race, retrying once");
                let code = self.reserve_code().await?;
                self.repo
                    .create(NewLink {
                        code,
                        original_url,
                        expires_at,
                    })
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// Generate-and-check loop with a fixed attempt budget.
    async fn reserve_code(&self) -> Result<String, AppError> {
        for _ in 0..GENERATE_ATTEMPTS {
            let code = generate_code(DEFAULT_CODE_LENGTH);

            if self.repo.find_by_code(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::SlugExhausted)
    }

    /// Renders, stores, and patches the QR side-artifact.
    ///
    /// Every step is best-effort: a failure is logged and the creation
    /// response simply carries no artifact reference.
    async fn attach_qr_artifact(&self, code: &str, short_url: &str) -> Option<String> {
        let bytes = match self.qr.render(short_url) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(%code, error = %e, "qr render failed, link created without artifact");
                return None;
            }
        };

        let artifact_ref = match self.artifacts.put(code, &bytes).await {
            Ok(artifact_ref) => artifact_ref,
            Err(ArtifactError::Disabled) => {
                debug!(%code, "artifact store disabled, skipping qr artifact");
                return None;
            }
            Err(e) => {
                warn!(%code, error = %e, "artifact write failed, link created without artifact");
                return None;
            }
        };

        if let Err(e) = self.repo.set_qr_artifact(code, &artifact_ref).await {
            warn!(%code, error = %e, "artifact stored but record patch failed");
        }

        Some(artifact_ref)
    }
}
