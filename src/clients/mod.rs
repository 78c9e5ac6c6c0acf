//! The shared request/response machinery of the Forge API client.
//!
//! Every resource-specific call funnels through the four primitives here:
//!
//! - build-request: [`ApiRequest::builder`]
//! - execute-request: [`Client::execute`] / [`Client::execute_raw`]
//! - classify-error: [`ApiError`] and its variants
//! - paginate: [`PaginationLinks`] on every response
//!
//! Resource method wrappers (list/get/create/edit/delete per endpoint) are
//! plain callers of these primitives and never touch the rate tracker or
//! webhook verifier directly.

pub mod errors;
pub mod http_client;
pub mod http_request;
pub mod http_response;
pub mod rate_limit;

pub use errors::{
    AbuseRateLimitError, AcceptedError, ApiError, ErrorBlock, ErrorResponse, FieldError,
    InvalidRequestError, RateLimitError, TwoFactorRequiredError,
};
pub use http_client::{Client, HEADER_OTP};
pub use http_request::{ApiRequest, ApiRequestBuilder, HttpMethod, ListOptions, QueryOptions};
pub use http_response::{ApiResponse, PaginationLinks, RawResponse};
pub use rate_limit::{RateCategory, RateLimiter, RateSnapshot};
