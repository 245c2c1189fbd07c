//! PostgreSQL implementation of the link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::map_insert_error;

const LINK_COLUMNS: &str = "id, code, original_url, created_at, expires_at, clicks, qr_artifact_ref";

/// PostgreSQL repository for link storage and retrieval.
///
/// The `links_code_key` unique constraint is the final arbiter of code
/// uniqueness; `create` translates a violation into [`AppError::AliasTaken`]
/// so callers can distinguish a lost race from an infrastructure failure.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let query = format!(
            "INSERT INTO links (code, original_url, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {LINK_COLUMNS}"
        );

        sqlx::query_as::<_, Link>(&query)
            .bind(&new_link.code)
            .bind(&new_link.original_url)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| map_insert_error(e, &new_link.code))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let query = format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1");

        let link = sqlx::query_as::<_, Link>(&query)
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(link)
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET clicks = clicks + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn set_qr_artifact(&self, code: &str, artifact_ref: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE links SET qr_artifact_ref = $2 WHERE code = $1")
            .bind(code)
            .bind(artifact_ref)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn list_expired_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Link>, AppError> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM links \
             WHERE expires_at IS NOT NULL AND expires_at < $1"
        );

        let links = sqlx::query_as::<_, Link>(&query)
            .bind(cutoff)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(links)
    }

    async fn delete_by_codes(&self, codes: &[String]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE code = ANY($1)")
            .bind(codes)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.pool.as_ref())
            .await
            .is_ok()
    }
}
