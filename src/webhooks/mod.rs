//! Inbound webhook verification and dispatch.
//!
//! This module is independent of the outbound request path. Handling a
//! delivery is a two-step pipeline:
//!
//! 1. [`validate_payload`]: verify the `X-Hub-Signature` keyed hash over
//!    the exact raw body bytes. The body is only returned on full success.
//! 2. [`parse_event`]: map the `X-Forge-Event` name to a typed payload via
//!    a closed, explicit table.
//!
//! # Example
//!
//! ```rust
//! use forge_api::webhooks::{
//!     compute_signature, parse_event, validate_payload, Event, SignatureAlgorithm,
//! };
//!
//! let secret = b"hook-secret";
//! let body = br#"{"zen":"Anything added dilutes everything else.","hook_id":1}"#;
//! // In a real handler the signature comes from the X-Hub-Signature header.
//! let signature = compute_signature(SignatureAlgorithm::Sha256, body, secret);
//!
//! let verified = validate_payload(body, &signature, secret).unwrap();
//! match parse_event("ping", verified).unwrap() {
//!     Event::Ping(ping) => assert_eq!(ping.hook_id, Some(1)),
//!     _ => unreachable!(),
//! }
//! ```

mod errors;
mod events;
mod verification;

pub use errors::WebhookError;
pub use events::{
    known_event_types, parse_event, Account, Comment, CreateEvent, DeleteEvent, Event, ForkEvent,
    Issue, IssueCommentEvent, IssuesEvent, MemberEvent, PingEvent, PublicEvent, PullRequest,
    PullRequestEvent, PushCommit, PushEvent, Release, ReleaseEvent, Repository, WatchEvent,
};
pub use verification::{
    compute_signature, validate_payload, SignatureAlgorithm, HEADER_DELIVERY, HEADER_EVENT,
    HEADER_SIGNATURE,
};
