//! Configuration types for the Forge API client.
//!
//! This module provides the core configuration types used to initialize
//! the client for API communication with a Forge installation.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ForgeConfig`]: The main configuration struct holding all client settings
//! - [`ForgeConfigBuilder`]: A builder for constructing [`ForgeConfig`] instances
//! - [`BaseUrl`]: A validated API base URL newtype
//!
//! # Example
//!
//! ```rust
//! use forge_api::{ForgeConfig, BaseUrl};
//!
//! // The default configuration points at the public Forge API
//! let config = ForgeConfig::default();
//! assert_eq!(config.base_url().as_str(), "https://api.forge.dev/");
//!
//! // Self-hosted installations override the base URL
//! let config = ForgeConfig::builder()
//!     .base_url(BaseUrl::new("https://forge.example.com/api/v3/").unwrap())
//!     .user_agent("my-tool/1.0")
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use crate::error::ConfigError;

/// The default public Forge API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.forge.dev/";

/// The default `Accept` media type for v3 of the API.
pub const DEFAULT_MEDIA_TYPE: &str = "application/vnd.forge.v3+json";

/// Client version from Cargo.toml.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for the Forge API client.
///
/// This struct holds all configuration needed for client operations: the
/// API base URL, the default `Accept` media type, and the `User-Agent`
/// header value.
///
/// # Thread Safety
///
/// `ForgeConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use forge_api::{ForgeConfig, BaseUrl};
///
/// let config = ForgeConfig::builder()
///     .base_url(BaseUrl::new("https://forge.example.com/api/v3/").unwrap())
///     .build()
///     .unwrap();
///
/// assert!(config.user_agent().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct ForgeConfig {
    base_url: BaseUrl,
    media_type: String,
    user_agent: Option<String>,
}

impl ForgeConfig {
    /// Creates a new builder for constructing a `ForgeConfig`.
    #[must_use]
    pub fn builder() -> ForgeConfigBuilder {
        ForgeConfigBuilder::new()
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default `Accept` media type.
    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the `User-Agent` value, or `None` when the header was
    /// explicitly cleared.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        ForgeConfigBuilder::new()
            .build()
            .expect("default configuration is valid")
    }
}

/// Builder for constructing [`ForgeConfig`] instances.
///
/// All fields have working defaults; the builder exists so that self-hosted
/// installations and embedding applications can override them with fail-fast
/// validation.
#[derive(Debug)]
pub struct ForgeConfigBuilder {
    base_url: Option<BaseUrl>,
    media_type: Option<String>,
    user_agent: Option<String>,
    user_agent_cleared: bool,
}

impl ForgeConfigBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            media_type: None,
            user_agent: None,
            user_agent_cleared: false,
        }
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Overrides the default `Accept` media type.
    #[must_use]
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Overrides the default `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Suppresses the `User-Agent` header entirely.
    ///
    /// Requests will carry no `User-Agent` at all rather than an empty one.
    #[must_use]
    pub const fn clear_user_agent(mut self) -> Self {
        self.user_agent_cleared = true;
        self
    }

    /// Builds the [`ForgeConfig`], validating all fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the media type or user agent is empty.
    /// The base URL is validated at [`BaseUrl`] construction time.
    pub fn build(self) -> Result<ForgeConfig, ConfigError> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => BaseUrl::new(DEFAULT_BASE_URL)?,
        };

        let media_type = self
            .media_type
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());
        if media_type.is_empty() {
            return Err(ConfigError::EmptyMediaType);
        }

        let user_agent = if self.user_agent_cleared {
            None
        } else {
            match self.user_agent {
                Some(ua) if ua.is_empty() => return Err(ConfigError::EmptyUserAgent),
                Some(ua) => Some(ua),
                None => Some(format!("forge-api-rust/{CLIENT_VERSION}")),
            }
        };

        Ok(ForgeConfig {
            base_url,
            media_type,
            user_agent,
        })
    }
}
