//! HTTP client for Forge API communication.
//!
//! This module provides the [`Client`] type that every resource call funnels
//! through. A call executes exactly one outbound request:
//!
//! 1. The rate tracker is consulted first; a known-exhausted quota fails the
//!    call locally without a network round trip.
//! 2. The transport decorator (if any) signs the request.
//! 3. The response's pagination links and rate headers are parsed and the
//!    snapshot recorded, on success and failure alike.
//! 4. Non-2xx statuses classify into exactly one [`ApiError`] variant.
//!
//! There is no internal retry: waiting out a rate-limit reset or backing off
//! after an abuse hint is the caller's decision, made from the structured
//! data on the error.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::auth::RequestSigner;
use crate::clients::errors::{
    AbuseRateLimitError, AcceptedError, ApiError, ErrorResponse, RateLimitError,
    TwoFactorRequiredError,
};
use crate::clients::http_request::{ApiRequest, HttpMethod};
use crate::clients::http_response::{
    first_header, parse_response_headers, ApiResponse, PaginationLinks, RawResponse,
};
use crate::clients::rate_limit::{RateCategory, RateLimiter, RateSnapshot};
use crate::config::ForgeConfig;

/// Response header carrying the one-time-password challenge on 401s.
pub const HEADER_OTP: &str = "X-Forge-OTP";

/// Message prefix the server uses for primary rate-limit rejections.
const RATE_LIMIT_PREFIX: &str = "API rate limit exceeded for ";

/// Documentation-URL fragment identifying abuse-detection rejections.
const ABUSE_DOCS_FRAGMENT: &str = "abuse-rate-limits";

/// HTTP client for making requests to the Forge API.
///
/// Any number of calls may run concurrently from the same client; the only
/// shared mutable state is the rate snapshot table, guarded by its own lock.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use forge_api::{ApiRequest, Client, ForgeConfig, HttpMethod};
///
/// let client = Client::new(ForgeConfig::default());
/// let request = ApiRequest::builder(HttpMethod::Get, "repos/octo/hello")
///     .build(client.config())?;
/// let response = client.execute::<serde_json::Value>(request).await?;
/// ```
#[derive(Debug)]
pub struct Client {
    /// The internal reqwest HTTP client.
    http: reqwest::Client,
    /// Client configuration.
    config: ForgeConfig,
    /// Last observed rate snapshots, one per category.
    rate_limiter: RateLimiter,
    /// Optional transport decorator applied before each send.
    signer: Option<Arc<dyn RequestSigner>>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a new unauthenticated client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen in extremely unusual circumstances (e.g., TLS
    /// initialization failure).
    #[must_use]
    pub fn new(config: ForgeConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates a client whose requests are decorated by `signer` before they
    /// reach the network layer.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created.
    #[must_use]
    pub fn with_signer(config: ForgeConfig, signer: Arc<dyn RequestSigner>) -> Self {
        Self::build(config, Some(signer))
    }

    fn build(config: ForgeConfig, signer: Option<Arc<dyn RequestSigner>>) -> Self {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            config,
            rate_limiter: RateLimiter::new(),
            signer,
        }
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ForgeConfig {
        &self.config
    }

    /// Returns the rate tracker owned by this client.
    #[must_use]
    pub const fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Executes a request and decodes the JSON response body into `T`.
    ///
    /// An empty success body yields `body: None` rather than a decode error;
    /// many endpoints legitimately return no body on 204/205.
    ///
    /// # Errors
    ///
    /// Returns exactly one [`ApiError`] variant per failed call; see the
    /// module documentation for the classification order.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        let (parts, body) = self.dispatch(request).await?;
        let decoded = if body.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&body).map_err(ApiError::Decode)?)
        };

        Ok(ApiResponse {
            status: parts.status,
            headers: parts.headers,
            pages: parts.pages,
            rate: parts.rate,
            body: decoded,
        })
    }

    /// Executes a request and returns the response body verbatim.
    ///
    /// Used with an `Accept` override for endpoints serving raw media such
    /// as diffs and patches, where JSON decoding would be wrong.
    ///
    /// # Errors
    ///
    /// Same classification as [`Client::execute`].
    pub async fn execute_raw(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let (parts, body) = self.dispatch(request).await?;
        Ok(RawResponse {
            status: parts.status,
            headers: parts.headers,
            pages: parts.pages,
            rate: parts.rate,
            body,
        })
    }

    /// Sends the request and returns the parsed parts plus the drained body
    /// of a successful (non-202) response.
    async fn dispatch(
        &self,
        mut request: ApiRequest,
    ) -> Result<(ResponseParts, Vec<u8>), ApiError> {
        let category = RateCategory::from_url_path(request.url.path());
        if let Some(error) = self.rate_limiter.check(category) {
            tracing::debug!(
                path = request.url.path(),
                "rate quota known exhausted; refusing call without network round trip"
            );
            return Err(ApiError::RateLimited(error));
        }

        if let Some(signer) = &self.signer {
            signer.sign(&mut request);
        }

        tracing::debug!(method = %request.method, path = request.url.path(), "dispatching request");

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(request.url.clone()),
            HttpMethod::Post => self.http.post(request.url.clone()),
            HttpMethod::Put => self.http.put(request.url.clone()),
            HttpMethod::Patch => self.http.patch(request.url.clone()),
            HttpMethod::Delete => self.http.delete(request.url.clone()),
        };
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        // A request without a body stays a true absence on the wire; only an
        // explicitly attached body is sent.
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let cancel = request.cancel.clone();
        let send = builder.send();
        let result = match &cancel {
            Some(token) => tokio::select! {
                () = token.cancelled() => return Err(ApiError::Cancelled),
                result = send => result,
            },
            None => send.await,
        };

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                // Cancellation takes priority over whatever the transport
                // reported for the aborted call.
                if cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
                    return Err(ApiError::Cancelled);
                }
                return Err(ApiError::Transport(sanitize_transport_error(error)));
            }
        };

        let status = response.status().as_u16();
        let headers = parse_response_headers(response.headers());
        let pages = first_header(&headers, "link")
            .map_or_else(PaginationLinks::default, PaginationLinks::parse_link_header);
        let rate = RateSnapshot::from_header_map(&headers);
        self.rate_limiter.record(category, rate);

        // Reading the whole body drains the connection so it can be reused,
        // and feeds both error classification and decoding.
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(error) => {
                if cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
                    return Err(ApiError::Cancelled);
                }
                return Err(ApiError::Transport(sanitize_transport_error(error)));
            }
        };

        let parts = ResponseParts {
            status,
            headers,
            pages,
            rate,
        };

        if parts.status == 202 {
            return Err(ApiError::Accepted(AcceptedError { raw: body }));
        }
        if (200..300).contains(&parts.status) {
            return Ok((parts, body));
        }
        Err(classify_error(parts, &body))
    }
}

/// Parsed response metadata shared by success and failure paths.
#[derive(Debug)]
struct ResponseParts {
    status: u16,
    headers: std::collections::HashMap<String, Vec<String>>,
    pages: PaginationLinks,
    rate: RateSnapshot,
}

/// Classifies a non-2xx response into exactly one error variant.
///
/// Predicates are evaluated in fixed order (OTP challenge, then rate
/// limit, then abuse detection, then the generic fallback) because a
/// response can satisfy several loose predicates (any 403) and only the
/// most specific one may win.
fn classify_error(parts: ResponseParts, body: &[u8]) -> ApiError {
    let mut error_response: ErrorResponse = if body.is_empty() {
        ErrorResponse::default()
    } else {
        serde_json::from_slice(body).unwrap_or_default()
    };
    error_response.status = parts.status;

    if parts.status == 401
        && first_header(&parts.headers, "x-forge-otp")
            .is_some_and(|challenge| challenge.starts_with("required"))
    {
        return ApiError::TwoFactorRequired(TwoFactorRequiredError {
            message: error_response.message,
        });
    }

    if parts.status == 403
        && first_header(&parts.headers, "x-ratelimit-remaining") == Some("0")
        && error_response.message.starts_with(RATE_LIMIT_PREFIX)
    {
        tracing::warn!(reset = %parts.rate.reset, "primary rate limit exhausted");
        return ApiError::RateLimited(RateLimitError {
            rate: parts.rate,
            message: error_response.message,
        });
    }

    if parts.status == 403
        && error_response
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains(ABUSE_DOCS_FRAGMENT))
    {
        let retry_after = first_header(&parts.headers, "retry-after")
            .and_then(|value| value.parse::<u64>().ok())
            .map(std::time::Duration::from_secs);
        tracing::warn!(?retry_after, "abuse detection triggered");
        return ApiError::AbuseDetected(AbuseRateLimitError {
            retry_after,
            message: error_response.message,
        });
    }

    ApiError::Response(error_response)
}

/// Redacts credential query values from any URL embedded in a transport
/// error, so connection failures can be logged without leaking secrets.
fn sanitize_transport_error(mut error: reqwest::Error) -> reqwest::Error {
    if let Some(url) = error.url_mut() {
        sanitize_url(url);
    }
    error
}

/// Replaces the `client_secret` query value with `REDACTED` in place.
pub(crate) fn sanitize_url(url: &mut url::Url) {
    let has_secret = url.query_pairs().any(|(key, _)| key == "client_secret");
    if !has_secret {
        return;
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "client_secret" {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
}
