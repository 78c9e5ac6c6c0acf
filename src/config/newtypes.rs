//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use url::Url;

/// A validated API base URL.
///
/// The base URL must be an absolute URL and must end with a trailing slash,
/// because relative endpoint paths are resolved against it: without the
/// trailing slash, `Url::join` replaces the final path segment instead of
/// appending to it.
///
/// # Example
///
/// ```rust
/// use forge_api::BaseUrl;
///
/// let base = BaseUrl::new("https://api.forge.dev/").unwrap();
/// assert_eq!(base.as_str(), "https://api.forge.dev/");
///
/// // Missing trailing slash is rejected
/// assert!(BaseUrl::new("https://api.forge.dev").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL cannot be parsed
    /// as an absolute URL, or [`ConfigError::MissingTrailingSlash`] if the
    /// path does not end with `/`.
    pub fn new(url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let raw = url.as_ref();
        let parsed = Url::parse(raw).map_err(|_| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
        })?;

        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw.to_string(),
            });
        }

        if !parsed.path().ends_with('/') {
            return Err(ConfigError::MissingTrailingSlash {
                url: raw.to_string(),
            });
        }

        Ok(Self(parsed))
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// Resolves a relative endpoint path against this base URL.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error if the relative path is not valid.
    pub fn join(&self, path: &str) -> Result<Url, url::ParseError> {
        self.0.join(path)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
