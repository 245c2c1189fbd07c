#![allow(dead_code)]

//! Shared test harness: an in-memory repository fake, a deterministic
//! fixed-window counter store, and an app builder wiring them into the
//! real router.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc};

use snaplink::application::services::{LinkService, RateLimiter};
use snaplink::domain::click_event::ClickEvent;
use snaplink::domain::entities::{Link, NewLink};
use snaplink::domain::repositories::LinkRepository;
use snaplink::error::AppError;
use snaplink::infrastructure::artifacts::{
    ArtifactStore, FsArtifactStore, NullArtifactStore, SvgQrRenderer,
};
use snaplink::infrastructure::counter::{
    CounterResult, CounterStore, NullCounterStore, WindowHit,
};
use snaplink::routes::api_router;
use snaplink::state::AppState;

/// In-memory repository fake with the same uniqueness semantics as the
/// real store: a second insert of a live code loses.
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, Link>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Inserts a pre-built record, bypassing the creation path.
    pub async fn seed(&self, link: Link) {
        self.links.lock().await.insert(link.code.clone(), link);
    }

    pub async fn get(&self, code: &str) -> Option<Link> {
        self.links.lock().await.get(code).cloned()
    }

    pub async fn len(&self) -> usize {
        self.links.lock().await.len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().await;

        if links.contains_key(&new_link.code) {
            return Err(AppError::AliasTaken {
                alias: new_link.code,
            });
        }

        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            code: new_link.code.clone(),
            original_url: new_link.original_url,
            created_at: Utc::now(),
            expires_at: new_link.expires_at,
            clicks: 0,
            qr_artifact_ref: None,
        };

        links.insert(new_link.code, link.clone());
        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.lock().await.get(code).cloned())
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        if let Some(link) = self.links.lock().await.get_mut(code) {
            link.clicks += 1;
        }
        Ok(())
    }

    async fn set_qr_artifact(&self, code: &str, artifact_ref: &str) -> Result<(), AppError> {
        if let Some(link) = self.links.lock().await.get_mut(code) {
            link.qr_artifact_ref = Some(artifact_ref.to_string());
        }
        Ok(())
    }

    async fn list_expired_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .await
            .values()
            .filter(|link| link.expires_at.is_some_and(|e| e < cutoff))
            .cloned()
            .collect())
    }

    async fn delete_by_codes(&self, codes: &[String]) -> Result<u64, AppError> {
        let mut links = self.links.lock().await;
        let mut deleted = 0;
        for code in codes {
            if links.remove(code).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Deterministic fixed-window counter keyed in process memory; only the
/// test harness may substitute this for the real store.
pub struct FixedWindowStore {
    windows: Mutex<HashMap<String, (Instant, u64)>>,
}

impl FixedWindowStore {
    pub fn new() -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CounterStore for FixedWindowStore {
    async fn hit(&self, key: &str, window: Duration) -> CounterResult<WindowHit> {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let entry = windows.entry(key.to_string()).or_insert((now, 0));

        if now.duration_since(entry.0) >= window {
            *entry = (now, 0);
        }

        entry.1 += 1;

        Ok(WindowHit {
            count: entry.1,
            remaining: window.checked_sub(now.duration_since(entry.0)),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Knobs for [`spawn_app_with`].
pub struct TestOptions {
    pub counter: Option<Arc<dyn CounterStore>>,
    pub rate_limit: u64,
    pub rate_window: Duration,
    pub artifacts: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            counter: None,
            rate_limit: 20,
            rate_window: Duration::from_secs(60),
            artifacts: true,
        }
    }
}

/// A running test application over the real router.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryLinkRepository>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
    pub artifact_root: Option<PathBuf>,
    _artifact_dir: Option<tempfile::TempDir>,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(TestOptions::default()).await
}

pub async fn spawn_app_with(options: TestOptions) -> TestApp {
    let repo = Arc::new(InMemoryLinkRepository::new());

    let (artifact_store, artifact_dir): (Arc<dyn ArtifactStore>, Option<tempfile::TempDir>) =
        if options.artifacts {
            let dir = tempfile::tempdir().unwrap();
            let store = FsArtifactStore::open(dir.path().to_path_buf(), "https://sho.rt/qr")
                .await
                .unwrap();
            (Arc::new(store), Some(dir))
        } else {
            (Arc::new(NullArtifactStore::new()), None)
        };

    let link_service = Arc::new(LinkService::new(
        repo.clone(),
        artifact_store,
        Arc::new(SvgQrRenderer),
        "https://sho.rt".to_string(),
    ));

    let counter = options
        .counter
        .unwrap_or_else(|| Arc::new(NullCounterStore::new()));
    let rate_limiter = Arc::new(RateLimiter::new(
        counter,
        options.rate_limit,
        options.rate_window,
    ));

    let (click_tx, click_rx) = mpsc::channel(100);

    let state = AppState::new(link_service, rate_limiter, click_tx, false);
    let server = TestServer::new(api_router(state)).unwrap();

    let artifact_root = artifact_dir.as_ref().map(|dir| dir.path().to_path_buf());

    TestApp {
        server,
        repo,
        click_rx,
        artifact_root,
        _artifact_dir: artifact_dir,
    }
}

/// A record seeded directly into the fake repository.
pub fn make_link(code: &str, url: &str, expires_at: Option<DateTime<Utc>>) -> Link {
    Link {
        id: 0,
        code: code.to_string(),
        original_url: url.to_string(),
        created_at: Utc::now(),
        expires_at,
        clicks: 0,
        qr_artifact_ref: None,
    }
}
