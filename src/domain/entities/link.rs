//! Link entity: the persisted record of a shortened URL.

use chrono::{DateTime, Utc};

/// A shortened URL record.
///
/// `code` is the globally unique, lower-cased lookup key. A record whose
/// `expires_at` lies in the past is logically dead even before the sweeper
/// physically removes it; read paths must treat it as gone.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub clicks: i64,
    pub qr_artifact_ref: Option<String>,
}

impl Link {
    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }
}

/// Input data for creating a new link.
///
/// `code` must already be validated, resolved for uniqueness, and
/// lower-cased; `original_url` must already be normalized.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub original_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>) -> Link {
        Link {
            id: 1,
            code: "abc1234".to_string(),
            original_url: "https://example.com".to_string(),
            created_at: Utc::now(),
            expires_at,
            clicks: 0,
            qr_artifact_ref: None,
        }
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        assert!(!link(None).is_expired());
    }

    #[test]
    fn test_link_past_expiry_is_expired() {
        let l = link(Some(Utc::now() - Duration::seconds(1)));
        assert!(l.is_expired());
    }

    #[test]
    fn test_link_future_expiry_is_live() {
        let l = link(Some(Utc::now() + Duration::hours(2)));
        assert!(!l.is_expired());
    }

    #[test]
    fn test_expiry_boundary_counts_as_expired() {
        let now = Utc::now();
        let l = link(Some(now));
        assert!(l.is_expired_at(now));
    }
}
