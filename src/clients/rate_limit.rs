//! Rate-limit tracking and pre-emptive throttling.
//!
//! The Forge API meters requests per category (the REST endpoints and the
//! search endpoints draw from separate quotas). Every response carries the
//! current quota in `X-RateLimit-*` headers; this module keeps the most
//! recently observed snapshot per category so that a call against a
//! known-exhausted quota can be refused locally, without a wasted network
//! round trip.
//!
//! The tracker is an owned component of [`Client`](crate::Client) rather
//! than process-global state, so tests (and embedders running several
//! clients) get isolated trackers.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::clients::errors::RateLimitError;

/// The quota pool a request draws from.
///
/// Derived deterministically from the request path: search endpoints have
/// their own, much smaller quota.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateCategory {
    /// The general REST quota.
    Core,
    /// The search endpoint quota.
    Search,
}

impl RateCategory {
    /// All declared categories. The snapshot table holds exactly one entry
    /// per element of this list.
    pub const ALL: [Self; 2] = [Self::Core, Self::Search];

    /// Resolves the category for a resolved URL path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use forge_api::RateCategory;
    ///
    /// assert_eq!(RateCategory::from_url_path("/search/issues"), RateCategory::Search);
    /// assert_eq!(RateCategory::from_url_path("/repos/o/r"), RateCategory::Core);
    /// ```
    #[must_use]
    pub fn from_url_path(path: &str) -> Self {
        if path.starts_with("/search/") || path == "/search" {
            Self::Search
        } else {
            Self::Core
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Core => 0,
            Self::Search => 1,
        }
    }
}

/// The most recently observed quota state for one rate category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateSnapshot {
    /// The request quota for the current window.
    pub limit: u32,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset: DateTime<Utc>,
}

impl Default for RateSnapshot {
    fn default() -> Self {
        Self {
            limit: 0,
            remaining: 0,
            reset: DateTime::UNIX_EPOCH,
        }
    }
}

impl RateSnapshot {
    /// Parses a snapshot from the lowercased response-header map.
    ///
    /// Absent or unparseable headers leave the corresponding field at its
    /// zero value; the reset header carries Unix seconds.
    #[must_use]
    pub(crate) fn from_header_map(headers: &HashMap<String, Vec<String>>) -> Self {
        let int = |name: &str| -> u32 {
            headers
                .get(name)
                .and_then(|values| values.first())
                .and_then(|value| value.parse().ok())
                .unwrap_or(0)
        };
        let reset = headers
            .get("x-ratelimit-reset")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<i64>().ok())
            .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
            .unwrap_or(DateTime::UNIX_EPOCH);

        Self {
            limit: int("x-ratelimit-limit"),
            remaining: int("x-ratelimit-remaining"),
            reset,
        }
    }
}

/// Tracks the last observed [`RateSnapshot`] per [`RateCategory`].
///
/// The snapshot table is the only mutable state shared across concurrent
/// calls. It is guarded by a single lock held only for the O(1) read or
/// write, never across network I/O, so the pre-check never suspends.
/// Concurrent updates are last-write-wins per category; the snapshot is
/// advisory, not a correctness-critical ledger.
#[derive(Debug, Default)]
pub struct RateLimiter {
    snapshots: Mutex<[RateSnapshot; 2]>,
}

impl RateLimiter {
    /// Creates a tracker with all categories at the zero snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-call check: returns a [`RateLimitError`] if and only if the
    /// stored snapshot for `category` has zero remaining quota AND its
    /// reset time is still strictly in the future.
    ///
    /// A snapshot whose reset equals the current instant is NOT treated as
    /// exhausted: the window has rolled over, so a live call is allowed.
    /// Pure read; never touches the network.
    #[must_use]
    pub fn check(&self, category: RateCategory) -> Option<RateLimitError> {
        let snapshot = self.snapshot(category);
        if snapshot.remaining == 0 && snapshot.reset > Utc::now() {
            return Some(RateLimitError {
                rate: snapshot,
                message: format!(
                    "API rate limit of {} still exceeded until {}, not making remote request.",
                    snapshot.limit, snapshot.reset
                ),
            });
        }
        None
    }

    /// Overwrites the stored snapshot for `category`.
    ///
    /// Called unconditionally after every completed call, success or
    /// failure, because rate headers are present on both.
    pub fn record(&self, category: RateCategory, snapshot: RateSnapshot) {
        let mut table = self
            .snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        table[category.index()] = snapshot;
    }

    /// Returns the stored snapshot for `category`.
    #[must_use]
    pub fn snapshot(&self, category: RateCategory) -> RateSnapshot {
        let table = self
            .snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        table[category.index()]
    }
}
