//! Response types for the Forge API client.
//!
//! This module provides the typed response envelope returned by
//! [`Client::execute`](crate::Client::execute) and the tolerant `Link`
//! header parser used for pagination.

use std::collections::HashMap;

use url::Url;

use crate::clients::rate_limit::RateSnapshot;

/// Page numbers parsed from the `Link` response header.
///
/// A zero value means the relation was not present (or not applicable): the
/// first page of a listing has no `prev` relation, and the last page has no
/// `next`.
///
/// # Example
///
/// ```rust
/// use forge_api::PaginationLinks;
///
/// let links = PaginationLinks::parse_link_header(
///     r#"<https://api.forge.dev/issues?page=1>; rel="first", <https://api.forge.dev/issues?page=3>; rel="next""#,
/// );
/// assert_eq!(links.first, 1);
/// assert_eq!(links.next, 3);
/// assert_eq!(links.prev, 0);
/// assert_eq!(links.last, 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaginationLinks {
    /// Page number of the first page.
    pub first: u32,
    /// Page number of the previous page.
    pub prev: u32,
    /// Page number of the next page.
    pub next: u32,
    /// Page number of the last page.
    pub last: u32,
}

impl PaginationLinks {
    /// Parses page numbers from a `Link` header value.
    ///
    /// The header carries comma-separated segments of the form
    /// `<url>; rel="next"`. Parsing is deliberately tolerant: a segment with
    /// fewer than two `;`-separated parts, a malformed URL, a missing or
    /// unparseable `page` query parameter, or an unknown relation is skipped
    /// without aborting the parse. Pagination metadata is advisory and must
    /// never turn a successful call into a failure.
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut links = Self::default();

        for segment in header_value.split(',') {
            let parts: Vec<&str> = segment.trim().split(';').collect();
            if parts.len() < 2 {
                continue;
            }

            let url_part = parts[0].trim();
            if !url_part.starts_with('<') || !url_part.ends_with('>') {
                continue;
            }
            let Ok(url) = Url::parse(&url_part[1..url_part.len() - 1]) else {
                continue;
            };

            let Some(page) = url
                .query_pairs()
                .find(|(key, _)| key == "page")
                .and_then(|(_, value)| value.parse::<u32>().ok())
            else {
                continue;
            };

            for rel_part in &parts[1..] {
                match rel_part.trim() {
                    r#"rel="first""# => links.first = page,
                    r#"rel="prev""# => links.prev = page,
                    r#"rel="next""# => links.next = page,
                    r#"rel="last""# => links.last = page,
                    _ => {}
                }
            }
        }

        links
    }
}

/// A decoded response from the Forge API.
///
/// Only 2xx responses (other than 202) produce an `ApiResponse`; everything
/// else classifies into an [`ApiError`](crate::ApiError) variant.
#[derive(Clone, Debug)]
pub struct ApiResponse<T> {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, lowercased; headers may carry multiple values.
    pub headers: HashMap<String, Vec<String>>,
    /// Pagination links parsed from the `Link` header.
    pub pages: PaginationLinks,
    /// The rate snapshot parsed from this response's headers.
    pub rate: RateSnapshot,
    /// The decoded body. `None` when the response body was empty, which is
    /// legitimate for 204/205 endpoints.
    pub body: Option<T>,
}

/// A raw response from the Forge API.
///
/// Returned by [`Client::execute_raw`](crate::Client::execute_raw) for
/// endpoints serving non-JSON media (diffs, patches, tarballs): the body is
/// handed over verbatim, undecoded.
#[derive(Clone, Debug)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, lowercased; headers may carry multiple values.
    pub headers: HashMap<String, Vec<String>>,
    /// Pagination links parsed from the `Link` header.
    pub pages: PaginationLinks,
    /// The rate snapshot parsed from this response's headers.
    pub rate: RateSnapshot,
    /// The raw response body bytes.
    pub body: Vec<u8>,
}

/// Collects response headers into a lowercase-keyed multi-value map.
pub(crate) fn parse_response_headers(
    headers: &reqwest::header::HeaderMap,
) -> HashMap<String, Vec<String>> {
    let mut result: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        let key = name.as_str().to_lowercase();
        let value = value.to_str().unwrap_or_default().to_string();
        result.entry(key).or_default().push(value);
    }
    result
}

/// Returns the first value of a header from the lowercase-keyed map.
pub(crate) fn first_header<'a>(
    headers: &'a HashMap<String, Vec<String>>,
    name: &str,
) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}
