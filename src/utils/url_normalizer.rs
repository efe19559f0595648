//! Probe target normalization.
//!
//! Submitted links are often bare hostnames (`example.com`). Before probing,
//! anything that is not an in-page anchor and lacks an explicit `http://` or
//! `https://` prefix gets `http://` prepended. The original submitted string is
//! still used as the key in result maps.

use std::borrow::Cow;
use url::Url;

/// Errors that can occur when turning a normalized target into a request URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Anchor links are not dereferenced")]
    Anchor,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Returns true for in-page anchors such as `#section`.
pub fn is_anchor(input: &str) -> bool {
    input.starts_with('#')
}

/// Normalizes a submitted link into the string that is actually probed.
///
/// # Rules
///
/// 1. `#`-anchors are returned unchanged
/// 2. Literal `http://` / `https://` prefixes are returned unchanged
/// 3. Everything else is prefixed with `http://`
///
/// The prefix check is literal and case-sensitive: `HTTP://x` becomes
/// `http://HTTP://x`, which later fails to parse and is reported unavailable.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_probe_target("example.com"), "http://example.com");
/// assert_eq!(normalize_probe_target("https://example.com"), "https://example.com");
/// assert_eq!(normalize_probe_target("#top"), "#top");
/// ```
pub fn normalize_probe_target(input: &str) -> Cow<'_, str> {
    if is_anchor(input) || input.starts_with("http://") || input.starts_with("https://") {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("http://{input}"))
    }
}

/// Parses a normalized target into a URL suitable for an outbound GET.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Anchor`] for `#`-anchors,
/// [`UrlNormalizationError::InvalidFormat`] for malformed URLs and
/// [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn parse_probe_url(target: &str) -> Result<Url, UrlNormalizationError> {
    if is_anchor(target) {
        return Err(UrlNormalizationError::Anchor);
    }

    let url = Url::parse(target).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(UrlNormalizationError::UnsupportedProtocol),
    }
}
