//! Error types for client configuration.
//!
//! This module contains error types used when constructing and validating
//! a [`ForgeConfig`](crate::ForgeConfig).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use forge_api::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types. Each variant provides a clear,
/// actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("Invalid base URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://api.forge.dev/').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The base URL does not end with a trailing slash.
    ///
    /// Relative endpoint paths are resolved against the base URL, so a
    /// missing trailing slash would silently drop the last path segment.
    #[error("Base URL '{url}' must end with a trailing slash.")]
    MissingTrailingSlash {
        /// The URL that was provided without a trailing slash.
        url: String,
    },

    /// The media type is empty.
    #[error("Media type cannot be empty. Use the default or provide a valid Accept media type.")]
    EmptyMediaType,

    /// The user agent is empty.
    ///
    /// To send no `User-Agent` header at all, use
    /// `ForgeConfigBuilder::clear_user_agent` instead of an empty string.
    #[error("User agent cannot be empty. Use clear_user_agent() to suppress the header entirely.")]
    EmptyUserAgent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("absolute URL"));
    }

    #[test]
    fn test_missing_trailing_slash_error_message() {
        let error = ConfigError::MissingTrailingSlash {
            url: "https://api.forge.dev/v3".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("trailing slash"));
        assert!(message.contains("https://api.forge.dev/v3"));
    }

    #[test]
    fn test_empty_user_agent_error_message() {
        let error = ConfigError::EmptyUserAgent;
        assert!(error.to_string().contains("clear_user_agent"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyMediaType;
        let _: &dyn std::error::Error = &error;
    }
}
