//! Shared application state injected into handlers.
//!
//! Every external-service handle is constructed once at startup and passed
//! in here; components never reach for module-level singletons.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{LinkService, RateLimiter};
use crate::domain::click_event::ClickEvent;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// When true, the rate limiter trusts `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkService>,
        rate_limiter: Arc<RateLimiter>,
        click_sender: mpsc::Sender<ClickEvent>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            link_service,
            rate_limiter,
            click_sender,
            behind_proxy,
        }
    }
}
