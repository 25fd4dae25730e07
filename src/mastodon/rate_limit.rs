// Rate-limit telemetry and the wait-on-429 contract.
//
// Mastodon advertises its call budget in X-RateLimit-* response headers
// (300 requests per 5 minutes by default). The client records that
// telemetry after every call and, when the server answers 429, sleeps
// until the advertised reset instant before retrying. Collectors above
// this layer never see a rate-limit error — a page fetch either returns
// a page or blocks until budget replenishes.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Maximum number of retry attempts after a 429 response.
pub const MAX_RETRIES: u32 = 5;

/// Backoff used when a 429 response carries no usable reset header.
pub const FALLBACK_BACKOFF: Duration = Duration::from_secs(30);

/// Longest we are willing to sleep waiting for a reset. Instances
/// reset every 5 minutes; anything beyond that is a clock problem.
pub const MAX_WAIT: Duration = Duration::from_secs(300);

/// A snapshot of the server's advertised call budget.
///
/// Read-only and informational — mirrored into the progress echo during
/// verbose runs, and consulted to size the sleep after a 429.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitStatus {
    /// Total budget ceiling per window (X-RateLimit-Limit).
    pub limit: u32,
    /// Calls remaining in the current window (X-RateLimit-Remaining).
    pub remaining: u32,
    /// When the budget replenishes (X-RateLimit-Reset).
    pub reset: DateTime<Utc>,
    /// When we last heard from the server.
    pub last_call: DateTime<Utc>,
}

impl RateLimitStatus {
    /// Parse the X-RateLimit-* headers from a response.
    ///
    /// Returns None if any of the three headers is missing or malformed —
    /// some proxies strip them, and partial telemetry is worse than none.
    pub fn from_headers(headers: &HeaderMap, now: DateTime<Utc>) -> Option<Self> {
        let limit = header_u32(headers, "X-RateLimit-Limit")?;
        let remaining = header_u32(headers, "X-RateLimit-Remaining")?;
        let reset = headers
            .get("X-RateLimit-Reset")?
            .to_str()
            .ok()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())?
            .with_timezone(&Utc);

        Some(Self {
            limit,
            remaining,
            reset,
            last_call: now,
        })
    }

    /// How long to sleep until this budget window resets.
    ///
    /// Zero if the reset instant is already in the past; clamped to
    /// `MAX_WAIT` to guard against a skewed server clock.
    pub fn delay_until_reset(&self, now: DateTime<Utc>) -> Duration {
        let delta = self.reset - now;
        match delta.to_std() {
            Ok(wait) => wait.min(MAX_WAIT),
            Err(_) => Duration::ZERO,
        }
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Check whether a response status means "budget exhausted, wait".
pub fn is_rate_limited(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
}
