//! URL normalization for creation requests.
//!
//! Inputs without a scheme get an `https://` prefix; scheme-bearing inputs
//! are kept as given. Either way the result must parse as an absolute
//! HTTP(S) URL with a host.

use std::borrow::Cow;
use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must have a host")]
    MissingHost,
}

/// Normalizes a creation request's URL to a stored representation.
///
/// # Rules
///
/// 1. Empty (after trimming) input is rejected.
/// 2. Input without a `://` separator is retried with an `https://` prefix.
/// 3. The result must parse and carry an `http` or `https` scheme; anything
///    else (`javascript:`, `file:`, `ftp:`, ...) is rejected.
/// 4. A host must be present.
///
/// The returned string is the input itself (plus the defaulted prefix), not
/// the parser's re-serialization, so scheme-bearing inputs round-trip
/// unchanged.
///
/// # Errors
///
/// [`UrlNormalizationError::InvalidFormat`] for unparseable input,
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes,
/// [`UrlNormalizationError::MissingHost`] for host-less URLs.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::InvalidFormat(
            "empty URL".to_string(),
        ));
    }

    let candidate: Cow<'_, str> = if trimmed.contains("://") {
        Cow::Borrowed(trimmed)
    } else if is_authority_form(trimmed) {
        Cow::Owned(format!("https://{trimmed}"))
    } else {
        // "mailto:a@b", "javascript:..." — a scheme without "://"
        return Err(UrlNormalizationError::UnsupportedProtocol);
    };

    let url = Url::parse(&candidate)
        .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if url.host_str().is_none() {
        return Err(UrlNormalizationError::MissingHost);
    }

    Ok(candidate.into_owned())
}

/// Distinguishes `host[:port]` from `scheme:payload` in input lacking `://`.
///
/// Only the part before the first `/` matters; a colon there must introduce
/// a numeric port for the input to count as an authority.
fn is_authority_form(input: &str) -> bool {
    let authority = input.split('/').next().unwrap_or("");
    match authority.split_once(':') {
        None => true,
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
    }
}
