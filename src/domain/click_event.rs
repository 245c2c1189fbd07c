//! Click event passed from the redirect handler to the background worker.

/// A single successful lookup, queued for asynchronous counting.
///
/// The redirect response must never wait on the counter write, so handlers
/// push one of these onto a bounded channel and move on; a full channel
/// drops the event.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
