//! Webhook signature verification.
//!
//! Forge signs webhook deliveries with a keyed hash over the exact raw
//! request body, using the secret configured on the hook. The signature
//! arrives in the `X-Hub-Signature` header as `<algorithm>=<hex-digest>`.
//!
//! [`validate_payload`] checks the signature and hands the raw body back to
//! the caller only on full success, so downstream decoding can never run on
//! an unverified payload.
//!
//! # Security
//!
//! Digest comparison is constant-time to prevent timing attacks. The
//! mismatch error carries no detail about which bytes differed.
//!
//! # Example
//!
//! ```rust
//! use forge_api::webhooks::{compute_signature, validate_payload, SignatureAlgorithm};
//!
//! let body = br#"{"zen":"Keep it logically awesome."}"#;
//! let secret = b"my-hook-secret";
//!
//! let header = compute_signature(SignatureAlgorithm::Sha256, body, secret);
//! let verified = validate_payload(body, &header, secret).unwrap();
//! assert_eq!(verified, body);
//! ```

use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::webhooks::WebhookError;

/// HTTP header name for the payload signature.
pub const HEADER_SIGNATURE: &str = "X-Hub-Signature";

/// HTTP header name for the declared event type.
pub const HEADER_EVENT: &str = "X-Forge-Event";

/// HTTP header name for the unique delivery identifier.
pub const HEADER_DELIVERY: &str = "X-Forge-Delivery";

/// The keyed-hash functions a signature header may select.
///
/// The algorithm is chosen by the literal prefix before the `=` separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// HMAC-SHA1 (the historical default).
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl SignatureAlgorithm {
    /// Resolves an algorithm from its header prefix.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Returns the header prefix for this algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

/// Computes the raw keyed digest of `body` under `secret`.
#[allow(clippy::missing_panics_doc)] // HMAC accepts any key size, so this never panics
fn compute_digest(algorithm: SignatureAlgorithm, body: &[u8], secret: &[u8]) -> Vec<u8> {
    match algorithm {
        SignatureAlgorithm::Sha1 => {
            let mut mac =
                Hmac::<Sha1>::new_from_slice(secret).expect("HMAC can take key of any size");
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
        SignatureAlgorithm::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(secret).expect("HMAC can take key of any size");
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
        SignatureAlgorithm::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(secret).expect("HMAC can take key of any size");
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
    }
}

/// Computes a full signature header value for `body` under `secret`.
///
/// Useful for producing test deliveries and for services that re-sign
/// forwarded payloads.
#[must_use]
pub fn compute_signature(algorithm: SignatureAlgorithm, body: &[u8], secret: &[u8]) -> String {
    let digest = compute_digest(algorithm, body, secret);
    format!("{}={}", algorithm.as_str(), hex::encode(digest))
}

/// Validates a signed webhook payload.
///
/// The signature header must have the form `<algorithm>=<hex-digest>`. Only
/// on full success is the raw body returned for further decoding.
///
/// # Errors
///
/// - [`WebhookError::MissingSignature`] when the header is empty
/// - [`WebhookError::UnknownAlgorithm`] when the prefix is unsupported
/// - [`WebhookError::MalformedSignature`] when the `=` separator is absent
///   or the hex digest fails to decode
/// - [`WebhookError::SignatureMismatch`] when the digest over the body does
///   not constant-time-equal the supplied digest
pub fn validate_payload<'a>(
    body: &'a [u8],
    signature_header: &str,
    secret: &[u8],
) -> Result<&'a [u8], WebhookError> {
    if signature_header.is_empty() {
        return Err(WebhookError::MissingSignature);
    }

    let (prefix, hex_digest) = signature_header
        .split_once('=')
        .ok_or(WebhookError::MalformedSignature)?;

    let algorithm = SignatureAlgorithm::from_prefix(prefix).ok_or_else(|| {
        WebhookError::UnknownAlgorithm {
            algorithm: prefix.to_string(),
        }
    })?;

    let expected = hex::decode(hex_digest).map_err(|_| WebhookError::MalformedSignature)?;
    let computed = compute_digest(algorithm, body, secret);

    if bool::from(computed.as_slice().ct_eq(expected.as_slice())) {
        Ok(body)
    } else {
        Err(WebhookError::SignatureMismatch)
    }
}
