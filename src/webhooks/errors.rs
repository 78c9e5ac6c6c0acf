//! Webhook-specific error types.
//!
//! # Error Handling
//!
//! Signature verification and event dispatch fail with specific variants:
//!
//! - [`WebhookError::MissingSignature`]: no signature header was supplied
//! - [`WebhookError::MalformedSignature`]: the header is not `<algorithm>=<hex>`
//! - [`WebhookError::UnknownAlgorithm`]: the algorithm prefix is unsupported
//! - [`WebhookError::SignatureMismatch`]: the digest does not match the body
//! - [`WebhookError::UnknownEventType`]: the declared event name is not in
//!   the dispatch table
//! - [`WebhookError::InvalidPayload`]: the payload failed JSON decoding

use thiserror::Error;

/// Error type for webhook verification and dispatch.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The signature header was absent or empty.
    #[error("Webhook signature header is missing.")]
    MissingSignature,

    /// The signature header lacks the `=` separator or the hex digest
    /// could not be decoded.
    #[error("Webhook signature header is malformed; expected '<algorithm>=<hex-digest>'.")]
    MalformedSignature,

    /// The algorithm prefix names none of the supported hash functions.
    #[error("Unknown webhook signature algorithm '{algorithm}'.")]
    UnknownAlgorithm {
        /// The unrecognized algorithm prefix.
        algorithm: String,
    },

    /// The computed digest over the raw body does not equal the supplied
    /// digest. The message is intentionally generic to avoid leaking
    /// security details.
    #[error("Webhook signature verification failed")]
    SignatureMismatch,

    /// The declared event type is not in the dispatch table.
    #[error("Unknown webhook event type '{event_type}'.")]
    UnknownEventType {
        /// The unrecognized event type name.
        event_type: String,
    },

    /// The payload failed structural JSON decoding.
    #[error("Could not decode webhook payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
