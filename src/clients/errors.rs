//! HTTP-specific error types for the Forge API client.
//!
//! This module contains the closed set of errors an API call can produce.
//! Exactly one variant is produced per failed call, and every variant carries
//! enough structured data (status code, rate snapshot, retry hint, per-field
//! problems) for a caller to decide programmatically whether to retry, back
//! off, or abort, without string matching on human-readable messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_api::{ApiError, Client};
//!
//! match client.execute::<serde_json::Value>(request).await {
//!     Ok(response) => println!("Success: {:?}", response.body),
//!     Err(ApiError::RateLimited(e)) => {
//!         println!("Quota exhausted until {}", e.rate.reset);
//!     }
//!     Err(ApiError::AbuseDetected(e)) => {
//!         println!("Back off for {:?}", e.retry_after);
//!     }
//!     Err(ApiError::Accepted(_)) => {
//!         println!("Job queued server-side; poll again later");
//!     }
//!     Err(e) => println!("Call failed: {e}"),
//! }
//! ```

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::clients::rate_limit::RateSnapshot;

/// Error returned when a request cannot be constructed.
///
/// These errors are produced by the request builder before anything touches
/// the network.
#[derive(Debug, Error)]
pub enum InvalidRequestError {
    /// The relative endpoint path could not be resolved against the base URL.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint path led with a path separator.
    ///
    /// Joining an absolute path against the base URL would silently discard
    /// the base URL's own path, so this is rejected outright.
    #[error("Endpoint path must be relative, without a leading '/': {path}")]
    AbsolutePath {
        /// The offending path.
        path: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Could not serialize request body to JSON: {0}")]
    InvalidBody(#[source] serde_json::Error),
}

/// Error returned when a rate-limit quota is exhausted.
///
/// Produced either pre-emptively by the local tracker (without a network
/// round trip) or from a server response that reports zero remaining quota.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RateLimitError {
    /// The offending rate snapshot, including the reset time the caller
    /// must wait out before retrying.
    pub rate: RateSnapshot,
    /// Human-readable message.
    pub message: String,
}

/// Error returned when the server's secondary abuse heuristic triggers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AbuseRateLimitError {
    /// Server-suggested wait before retrying, from the `Retry-After`
    /// header. When absent the caller must pick its own backoff.
    pub retry_after: Option<Duration>,
    /// Human-readable message.
    pub message: String,
}

/// Error returned when the server demands a two-factor one-time password.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TwoFactorRequiredError {
    /// Human-readable message.
    pub message: String,
}

/// Advisory returned for HTTP 202 responses.
///
/// Not a true failure: the server queued an asynchronous job and the caller
/// should retry the same request later. The raw body (possibly empty) is
/// preserved for callers that want to inspect it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Job scheduled on the server side; try again later.")]
pub struct AcceptedError {
    /// The raw, undecoded response body.
    pub raw: Vec<u8>,
}

/// A single per-field problem from a 4xx error body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    /// The resource the error relates to (e.g., `"Issue"`).
    #[serde(default)]
    pub resource: String,
    /// The field on the resource.
    #[serde(default)]
    pub field: String,
    /// The validation code (e.g., `"missing_field"`).
    #[serde(default)]
    pub code: String,
    /// Optional free-form message for `code == "custom"` errors.
    #[serde(default)]
    pub message: Option<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error caused by {} field on {} resource",
            self.code, self.field, self.resource
        )
    }
}

/// Block metadata attached to some error responses (e.g., legal takedowns).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorBlock {
    /// The reason the content is blocked.
    #[serde(default)]
    pub reason: Option<String>,
    /// When the block was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The generic error-response shape for non-2xx statuses.
///
/// This is the fallback classification: more specific predicates (OTP
/// challenge, rate limit, abuse detection) are checked first and win.
#[derive(Debug, Error, Clone, Default, PartialEq, Eq, Deserialize)]
#[error("{status}: {message}")]
pub struct ErrorResponse {
    /// The HTTP status code. Populated by the response processor, not the
    /// JSON body.
    #[serde(skip)]
    pub status: u16,
    /// The top-level error message.
    #[serde(default)]
    pub message: String,
    /// Structured per-field validation problems, if any.
    #[serde(default)]
    pub errors: Vec<FieldError>,
    /// Block metadata, if the content is blocked.
    #[serde(default)]
    pub block: Option<ErrorBlock>,
    /// Link into the API documentation for this error.
    #[serde(default)]
    pub documentation_url: Option<String>,
}

/// Unified error type for all API call failures.
///
/// Use pattern matching to handle specific failure classes; each variant is
/// produced by exactly one classification predicate.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be constructed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Network, DNS, or redirect failure. Any URL embedded in the error has
    /// had credential query values redacted.
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The caller's cancellation signal fired while the call was in flight.
    #[error("Request was cancelled before completion.")]
    Cancelled,

    /// Quota exhausted, either pre-empted locally or reported by the server.
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    /// The server's abuse-detection heuristic triggered.
    #[error(transparent)]
    AbuseDetected(#[from] AbuseRateLimitError),

    /// The server demands a two-factor one-time password.
    #[error(transparent)]
    TwoFactorRequired(#[from] TwoFactorRequiredError),

    /// HTTP 202: the work was queued server-side; retry later.
    #[error(transparent)]
    Accepted(#[from] AcceptedError),

    /// Any other non-2xx response.
    #[error(transparent)]
    Response(#[from] ErrorResponse),

    /// A non-empty success body failed structural JSON decoding.
    #[error("Could not decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let error = FieldError {
            resource: "Issue".to_string(),
            field: "title".to_string(),
            code: "missing_field".to_string(),
            message: None,
        };
        assert_eq!(
            error.to_string(),
            "missing_field error caused by title field on Issue resource"
        );
    }

    #[test]
    fn test_error_response_deserializes_partial_body() {
        let body = r#"{"message":"Validation Failed","errors":[{"resource":"Issue","field":"title","code":"missing_field"}]}"#;
        let response: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message, "Validation Failed");
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].code, "missing_field");
        assert!(response.block.is_none());
        assert!(response.documentation_url.is_none());
    }

    #[test]
    fn test_error_response_tolerates_unknown_fields() {
        let body = r#"{"message":"Bad","request_id":"abc"}"#;
        let response: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message, "Bad");
    }

    #[test]
    fn test_error_response_display_includes_status() {
        let response = ErrorResponse {
            status: 422,
            message: "Validation Failed".to_string(),
            ..ErrorResponse::default()
        };
        assert_eq!(response.to_string(), "422: Validation Failed");
    }

    #[test]
    fn test_accepted_error_is_distinct_from_response() {
        let error: ApiError = AcceptedError { raw: Vec::new() }.into();
        assert!(matches!(error, ApiError::Accepted(_)));
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let rate_error: &dyn std::error::Error = &RateLimitError {
            rate: RateSnapshot::default(),
            message: "limit".to_string(),
        };
        let _ = rate_error;

        let abuse_error: &dyn std::error::Error = &AbuseRateLimitError {
            retry_after: Some(Duration::from_secs(30)),
            message: "abuse".to_string(),
        };
        let _ = abuse_error;

        let cancelled: &dyn std::error::Error = &ApiError::Cancelled;
        let _ = cancelled;
    }
}
