//! Request input validation
//!
//! Syntactic checks only: whether a host is actually supported is decided by
//! the extractor.

use thiserror::Error;
use url::Url;

/// Schemes accepted for video page URLs
pub const ACCEPTED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// No URL in the request, or only whitespace
    #[error("URL is required")]
    MissingUrl,

    /// URL does not start with an accepted scheme or cannot be parsed
    #[error("Invalid URL format")]
    InvalidUrl(String),
}

/// Validates a user-supplied video page URL.
///
/// # Examples
/// ```
/// use vidresolve::core::validation::validate_media_url;
///
/// assert!(validate_media_url(Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")).is_ok());
/// assert!(validate_media_url(Some("http://vimeo.com/76979871")).is_ok());
///
/// assert!(validate_media_url(None).is_err());
/// assert!(validate_media_url(Some("ftp://example.com/video")).is_err());
/// assert!(validate_media_url(Some("youtube.com/watch?v=x")).is_err());
/// ```
pub fn validate_media_url(url: Option<&str>) -> Result<Url, ValidationError> {
    let url = url.filter(|u| !u.trim().is_empty()).ok_or(ValidationError::MissingUrl)?;

    if !ACCEPTED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        return Err(ValidationError::InvalidUrl(url.to_string()));
    }

    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl(url.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl(url.to_string()));
    }

    Ok(parsed)
}
