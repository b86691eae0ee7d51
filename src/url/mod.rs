//! URL validation for interactive input
//!
//! Only a minimal sanity check happens here: the scheme prefix, a dot
//! somewhere in the string, and a parse into an absolute URL with a host.
//! Anything that fails is rejected before a request is issued.

use crate::{UrlError, UrlResult};
use ::url::Url;

const ALLOWED_PREFIXES: [&str; 2] = ["https://", "http://"];

/// Validates a candidate URL typed by the user
///
/// # Rules
///
/// 1. The string must be non-empty
/// 2. It must start with `https://` or `http://` (case-sensitive)
/// 3. It must contain at least one `.`
/// 4. It must parse as an absolute URL with a host
///
/// # Examples
///
/// ```
/// use shopscrape::url::validate_url;
///
/// assert!(validate_url("https://example.com/shop").is_ok());
/// assert!(validate_url("ftp://example.com").is_err());
/// assert!(validate_url("HTTPS://example.com").is_err());
/// ```
pub fn validate_url(candidate: &str) -> UrlResult<Url> {
    if candidate.is_empty() {
        return Err(UrlError::Empty);
    }

    if !ALLOWED_PREFIXES
        .iter()
        .any(|prefix| candidate.starts_with(prefix))
    {
        return Err(UrlError::InvalidScheme(candidate.to_string()));
    }

    if !candidate.contains('.') {
        return Err(UrlError::MissingDomain(candidate.to_string()));
    }

    let parsed =
        Url::parse(candidate).map_err(|e| UrlError::Malformed(format!("{}: {}", candidate, e)))?;

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(UrlError::MissingDomain(candidate.to_string())),
    }
}

/// Returns true if the candidate passes [`validate_url`]
pub fn is_valid_url(candidate: &str) -> bool {
    validate_url(candidate).is_ok()
}
