//! Admission middleware for the creation endpoints.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;

/// Gates a request through the fixed-window rate limiter.
///
/// Attach with `axum::middleware::from_fn_with_state` on the routes that
/// create links. Rejections carry a `Retry-After` header; counter-store
/// outages admit the request (fail-open, handled by the limiter itself).
pub async fn admission_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(&request, state.behind_proxy);

    state.rate_limiter.admit(&client).await?;

    Ok(next.run(request).await)
}

/// Extracts the client identity a counter is keyed by.
///
/// The peer socket address is authoritative. Behind a trusted reverse
/// proxy (`BEHIND_PROXY=true`) the `X-Forwarded-For` / `X-Real-IP` headers
/// take precedence, since every peer address would otherwise be the proxy.
fn client_key(request: &Request, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            return forwarded.to_string();
        }

        if let Some(real_ip) = request
            .headers()
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            return real_ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    fn request_with_headers(headers: &[(&str, &str)]) -> Request {
        let mut builder = HttpRequest::builder().uri("/shorten");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let mut request = request_with_headers(&[("x-forwarded-for", "203.0.113.9")]);
        request
            .extensions_mut()
            .insert(ConnectInfo("10.0.0.1:55555".parse::<SocketAddr>().unwrap()));

        // Not behind a proxy: forwarded headers are untrusted.
        assert_eq!(client_key(&request, false), "10.0.0.1");
    }

    #[test]
    fn test_forwarded_for_behind_proxy() {
        let request = request_with_headers(&[("x-forwarded-for", "203.0.113.9, 10.0.0.1")]);
        assert_eq!(client_key(&request, true), "203.0.113.9");
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let request = request_with_headers(&[("x-real-ip", "198.51.100.7")]);
        assert_eq!(client_key(&request, true), "198.51.100.7");
    }

    #[test]
    fn test_unknown_when_no_identity_available() {
        let request = request_with_headers(&[]);
        assert_eq!(client_key(&request, false), "unknown");
    }
}
