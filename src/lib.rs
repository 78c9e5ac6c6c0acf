//! # Forge API Rust client
//!
//! A Rust client for the Forge REST API, providing the shared
//! request/response machinery that resource calls are built on: request
//! construction, rate-limit tracking with pre-emptive throttling,
//! pagination-link parsing, typed error classification, and inbound webhook
//! signature verification.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ForgeConfig`] and [`ForgeConfigBuilder`]
//! - Request construction with structured query options via [`ApiRequest`]
//! - An async [`Client`] that classifies every failure into one
//!   [`ApiError`] variant
//! - Local rate-limit tracking that refuses calls against a known-exhausted
//!   quota without a network round trip
//! - Pluggable request signing via [`auth::RequestSigner`]
//! - Webhook signature verification and typed event dispatch via
//!   [`webhooks`]
//!
//! ## Making API Requests
//!
//! ```rust,ignore
//! use forge_api::{ApiRequest, Client, ForgeConfig, HttpMethod, ListOptions};
//!
//! let client = Client::new(ForgeConfig::default());
//!
//! let request = ApiRequest::builder(HttpMethod::Get, "repos/octo/hello/issues")
//!     .options(&ListOptions { page: Some(2), per_page: Some(50) })
//!     .build(client.config())?;
//!
//! let response = client.execute::<serde_json::Value>(request).await?;
//! if response.pages.next != 0 {
//!     // fetch the next page with ListOptions { page: Some(response.pages.next), .. }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failed call produces exactly one [`ApiError`] variant carrying the
//! structured data needed to decide whether to retry, back off, or abort.
//! The crate itself never retries: waiting out a rate-limit reset is the
//! caller's call.
//!
//! ```rust,ignore
//! use forge_api::ApiError;
//!
//! match client.execute::<serde_json::Value>(request).await {
//!     Err(ApiError::RateLimited(e)) => eprintln!("wait until {}", e.rate.reset),
//!     Err(ApiError::AbuseDetected(e)) => eprintln!("back off {:?}", e.retry_after),
//!     Err(ApiError::Accepted(_)) => eprintln!("queued server-side, poll later"),
//!     Err(e) => eprintln!("failed: {e}"),
//!     Ok(response) => println!("{:?}", response.body),
//! }
//! ```
//!
//! ## Handling Webhooks
//!
//! ```rust,ignore
//! use forge_api::webhooks::{parse_event, validate_payload, Event};
//!
//! let verified = validate_payload(&body, &signature_header, secret)?;
//! match parse_event(&event_type, verified)? {
//!     Event::Push(push) => println!("pushed {:?}", push.ref_name),
//!     Event::Ping(_) => println!("hook installed"),
//!     other => println!("unhandled {}", other.event_type()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and rate tracking are instance-based
//! - **Fail-fast validation**: config newtypes and request building validate
//!   on construction
//! - **Thread-safe**: [`Client`] is `Send + Sync`; calls run concurrently
//!   from one instance
//! - **Async-first**: designed for use with the Tokio async runtime
//! - **Absent is not zero**: optional payload fields are `Option<T>`
//!   throughout

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod webhooks;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ForgeConfig, ForgeConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    AbuseRateLimitError, AcceptedError, ApiError, ApiRequest, ApiRequestBuilder, ApiResponse,
    Client, ErrorBlock, ErrorResponse, FieldError, HttpMethod, InvalidRequestError, ListOptions,
    PaginationLinks, QueryOptions, RateCategory, RateLimitError, RateLimiter, RateSnapshot,
    RawResponse, TwoFactorRequiredError,
};
