//! Request construction for the Forge API client.
//!
//! This module provides the [`ApiRequest`] type and its builder. A request
//! is built once per call from the base URL plus a relative endpoint path,
//! query parameters derived from a structured options value, and an optional
//! JSON body, and is immutable after construction (transport decorators
//! aside).
//!
//! # Example
//!
//! ```rust
//! use forge_api::{ApiRequest, ForgeConfig, HttpMethod, ListOptions};
//!
//! let config = ForgeConfig::default();
//!
//! let request = ApiRequest::builder(HttpMethod::Get, "repos/octo/hello/issues")
//!     .options(&ListOptions { page: Some(2), per_page: Some(50) })
//!     .build(&config)
//!     .unwrap();
//!
//! assert_eq!(request.url.path(), "/repos/octo/hello/issues");
//! assert_eq!(request.url.query(), Some("page=2&per_page=50"));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::clients::errors::InvalidRequestError;
use crate::config::ForgeConfig;

/// HTTP methods used by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for editing resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured options value encoded into query parameters.
///
/// Each field declares its own query key and only non-empty fields are
/// emitted, so an options value with nothing set is a no-op on the URL.
pub trait QueryOptions {
    /// Returns the `(key, value)` pairs for every field that is set.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Paging options shared by all list endpoints.
///
/// The absent-vs-zero distinction matters here: `page: None` omits the
/// parameter entirely and lets the server pick its default.
///
/// # Example
///
/// ```rust
/// use forge_api::{ListOptions, QueryOptions};
///
/// let options = ListOptions { page: Some(3), per_page: None };
/// assert_eq!(options.query_pairs(), vec![("page", "3".to_string())]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// The page of results to fetch.
    pub page: Option<u32>,
    /// The number of results per page.
    pub per_page: Option<u32>,
}

impl QueryOptions for ListOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}

/// An outbound request to the Forge API.
///
/// Built once per call via [`ApiRequest::builder`]; the fields are public so
/// transport decorators (see [`crate::auth`]) can adjust headers or URL
/// before the request reaches the network layer.
///
/// A request with no body carries a true body absence on the wire. It is
/// NOT equivalent to a request with an empty body, and no `Content-Type`
/// header is attached in that case.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The fully resolved URL, query parameters included.
    pub url: Url,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// The serialized JSON body, if any.
    pub body: Option<String>,
    /// The caller's cancellation signal for this call, if any.
    pub cancel: Option<CancellationToken>,
}

impl ApiRequest {
    /// Creates a new builder for the given method and relative endpoint
    /// path. The path must not lead with `/`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> ApiRequestBuilder {
        ApiRequestBuilder::new(method, path)
    }
}

/// Builder for [`ApiRequest`] instances.
#[derive(Debug)]
pub struct ApiRequestBuilder {
    method: HttpMethod,
    path: String,
    query: Vec<(&'static str, String)>,
    accept: Option<String>,
    extra_headers: HashMap<String, String>,
    body: Option<String>,
    cancel: Option<CancellationToken>,
}

impl ApiRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            accept: None,
            extra_headers: HashMap::new(),
            body: None,
            cancel: None,
        }
    }

    /// Encodes a structured options value into query parameters.
    ///
    /// Only the options' non-empty fields are appended; an empty options
    /// value leaves the URL untouched.
    #[must_use]
    pub fn options(mut self, options: &impl QueryOptions) -> Self {
        self.query.extend(options.query_pairs());
        self
    }

    /// Serializes `body` to JSON and attaches it as the request payload.
    ///
    /// The `Content-Type: application/json` header is attached at build
    /// time. Omitting this call sends no body and no content type at all.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::InvalidBody`] when serialization
    /// fails (e.g., a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, InvalidRequestError> {
        let serialized = serde_json::to_string(body).map_err(InvalidRequestError::InvalidBody)?;
        self.body = Some(serialized);
        Ok(self)
    }

    /// Overrides the `Accept` header for this call only.
    ///
    /// Used for preview and alternate media types (e.g., raw diff formats).
    #[must_use]
    pub fn accept(mut self, media_type: impl Into<String>) -> Self {
        self.accept = Some(media_type.into());
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Attaches the caller's cancellation signal for this call.
    #[must_use]
    pub fn cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Builds the [`ApiRequest`], resolving the endpoint path against the
    /// configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::AbsolutePath`] when the path leads
    /// with `/`, or [`InvalidRequestError::InvalidUrl`] when it cannot be
    /// resolved against the base URL.
    pub fn build(self, config: &ForgeConfig) -> Result<ApiRequest, InvalidRequestError> {
        if self.path.starts_with('/') {
            return Err(InvalidRequestError::AbsolutePath { path: self.path });
        }

        let mut url = config.base_url().join(&self.path)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        let mut headers = HashMap::new();
        headers.insert(
            "Accept".to_string(),
            self.accept
                .unwrap_or_else(|| config.media_type().to_string()),
        );
        if let Some(user_agent) = config.user_agent() {
            headers.insert("User-Agent".to_string(), user_agent.to_string());
        }
        if self.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        headers.extend(self.extra_headers);

        Ok(ApiRequest {
            method: self.method,
            url,
            headers,
            body: self.body,
            cancel: self.cancel,
        })
    }
}
