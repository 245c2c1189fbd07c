mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};

use snaplink::domain::expiry_sweeper::sweep_once;
use snaplink::infrastructure::artifacts::{ArtifactStore, FsArtifactStore};

use common::{InMemoryLinkRepository, make_link};

async fn seeded_store(dir: &tempfile::TempDir, codes: &[&str]) -> FsArtifactStore {
    let store = FsArtifactStore::open(dir.path().to_path_buf(), "https://sho.rt/qr")
        .await
        .unwrap();
    for code in codes {
        store.put(code, b"<svg/>").await.unwrap();
    }
    store
}

#[tokio::test]
async fn test_sweep_reclaims_expired_records_and_artifacts() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir, &["dead-a", "dead-b", "alive-z"]).await;

    let past = Some(Utc::now() - Duration::hours(1));
    let future = Some(Utc::now() + Duration::days(1));

    for (code, expiry) in [
        ("dead-a", past),
        ("dead-b", past),
        ("dead-c", past),
        ("alive-z", future),
    ] {
        let mut link = make_link(code, "https://example.com", expiry);
        if code != "dead-c" {
            link.qr_artifact_ref = Some(format!("https://sho.rt/qr/{code}.svg"));
        }
        repo.seed(link).await;
    }

    let outcome = sweep_once(repo.as_ref(), &store).await.unwrap();

    assert_eq!(outcome.matched, 3);
    assert_eq!(outcome.artifacts_deleted, 2);
    assert_eq!(outcome.records_deleted, 3);

    // Exactly the expired records and their artifacts are gone.
    assert!(repo.get("dead-a").await.is_none());
    assert!(repo.get("dead-b").await.is_none());
    assert!(repo.get("dead-c").await.is_none());
    assert!(repo.get("alive-z").await.is_some());

    assert!(!dir.path().join("dead-a.svg").exists());
    assert!(!dir.path().join("dead-b.svg").exists());
    assert!(dir.path().join("alive-z.svg").exists());
}

#[tokio::test]
async fn test_sweep_is_idempotent() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir, &[]).await;

    repo.seed(make_link(
        "dead-a",
        "https://example.com",
        Some(Utc::now() - Duration::hours(1)),
    ))
    .await;

    let first = sweep_once(repo.as_ref(), &store).await.unwrap();
    assert_eq!(first.records_deleted, 1);

    let second = sweep_once(repo.as_ref(), &store).await.unwrap();
    assert_eq!(second.matched, 0);
    assert_eq!(second.records_deleted, 0);
}

#[tokio::test]
async fn test_sweep_ignores_links_without_expiry() {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&dir, &[]).await;

    repo.seed(make_link("forever", "https://example.com", None))
        .await;

    let outcome = sweep_once(repo.as_ref(), &store).await.unwrap();
    assert_eq!(outcome.matched, 0);
    assert!(repo.get("forever").await.is_some());
}
