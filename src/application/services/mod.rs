mod link_service;
mod rate_limiter;

pub use link_service::{CreateLinkRequest, CreatedLink, LinkService};
pub use rate_limiter::RateLimiter;
