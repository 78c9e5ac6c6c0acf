//! Transport decorators for outbound request signing.
//!
//! Authentication is pluggable: a [`RequestSigner`] transforms an outbound
//! [`ApiRequest`] just before it reaches the network layer. The client never
//! knows which scheme is in use; it only applies the decorator.
//!
//! Two decorators are provided:
//!
//! - [`BasicAuthSigner`]: username/password basic auth with an optional
//!   two-factor one-time password.
//! - [`UnauthenticatedRateLimitedSigner`]: appends OAuth application
//!   credentials as query parameters, which lifts unauthenticated calls to
//!   the higher application rate limit without acting on behalf of a user.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use forge_api::auth::BasicAuthSigner;
//! use forge_api::{Client, ForgeConfig};
//!
//! let signer = BasicAuthSigner::new("octo", "s3cret").with_otp("123456");
//! let client = Client::with_signer(ForgeConfig::default(), Arc::new(signer));
//! ```

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::clients::http_client::HEADER_OTP;
use crate::clients::ApiRequest;

/// Decorates an outbound request before it reaches the network layer.
///
/// Implementations must be cheap and infallible: a signer only rewrites
/// headers or query parameters on the already-built request.
pub trait RequestSigner: Send + Sync + fmt::Debug {
    /// Transforms the request in place.
    fn sign(&self, request: &mut ApiRequest);
}

/// HTTP basic authentication with an optional two-factor one-time password.
///
/// When the account has two-factor authentication enabled, the server
/// rejects basic-auth calls with a 401 OTP challenge until the current
/// one-time password is supplied via [`BasicAuthSigner::with_otp`].
#[derive(Clone)]
pub struct BasicAuthSigner {
    username: String,
    password: String,
    otp: Option<String>,
}

impl BasicAuthSigner {
    /// Creates a signer for the given credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            otp: None,
        }
    }

    /// Attaches the current one-time password.
    #[must_use]
    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }
}

impl fmt::Debug for BasicAuthSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthSigner")
            .field("username", &self.username)
            .field("password", &"*****")
            .field("otp", &self.otp.as_ref().map(|_| "*****"))
            .finish()
    }
}

impl RequestSigner for BasicAuthSigner {
    fn sign(&self, request: &mut ApiRequest) {
        let credentials = STANDARD.encode(format!("{}:{}", self.username, self.password));
        request
            .headers
            .insert("Authorization".to_string(), format!("Basic {credentials}"));
        if let Some(otp) = &self.otp {
            request.headers.insert(HEADER_OTP.to_string(), otp.clone());
        }
    }
}

/// OAuth application credentials appended as query parameters.
///
/// Requests signed this way are not authenticated as any particular user,
/// but draw from the application's larger rate-limit quota. The
/// `client_secret` value is exactly what the transport-error sanitizer
/// redacts, so a failed call never leaks it.
#[derive(Clone)]
pub struct UnauthenticatedRateLimitedSigner {
    client_id: String,
    client_secret: String,
}

impl UnauthenticatedRateLimitedSigner {
    /// Creates a signer for the given OAuth application credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for UnauthenticatedRateLimitedSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnauthenticatedRateLimitedSigner")
            .field("client_id", &self.client_id)
            .field("client_secret", &"*****")
            .finish()
    }
}

impl RequestSigner for UnauthenticatedRateLimitedSigner {
    fn sign(&self, request: &mut ApiRequest) {
        request
            .url
            .query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret);
    }
}
