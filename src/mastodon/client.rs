// Authenticated Mastodon REST client — thin reqwest wrapper.
//
// All endpoints this tool needs are plain JSON GETs. Pagination follows
// the RFC 5988 `Link` header: each page response carries a rel="next"
// URL, and requesting past the last page returns a body with no next
// link (or no items), which ends the walk. Rate-limit handling lives in
// the `rate_limit` module; this client records telemetry after every
// response and sleeps through 429s so callers never see them.

use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::accounts::Account;
use super::rate_limit::{self, RateLimitStatus, FALLBACK_BACKOFF, MAX_RETRIES};
use super::statuses::Status;
use super::traits::MastodonApi;

/// Page size requested when walking a following list (the server caps at 80).
const FOLLOWING_PAGE_SIZE: usize = 80;

/// One batch of paginated results plus its continuation.
///
/// `next` is the rel="next" URL from the response's Link header; None
/// means the server has no further page.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

/// Authenticated HTTP client for a single Mastodon instance.
///
/// Constructed once from the config and passed by reference for the
/// whole run. The only interior state is the rate-limit snapshot,
/// which is telemetry — the client is never reconfigured mid-run.
pub struct MastodonClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    rate_limit: Mutex<Option<RateLimitStatus>>,
}

impl MastodonClient {
    /// Create a client for the given instance.
    pub fn new(instance_url: &str, access_token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("fedistats/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: instance_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            rate_limit: Mutex::new(None),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    /// GET a URL, absorbing 429s, and return the raw response.
    ///
    /// Telemetry is recorded from every response, including errors. On a
    /// 429 we sleep until the advertised reset (or a fallback backoff
    /// when the header is missing) and retry, up to `MAX_RETRIES` times.
    async fn get_with_rate_limit(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response> {
        let mut attempt = 0u32;

        loop {
            debug!(url = url, "GET request");

            let response = self
                .http
                .get(url)
                .bearer_auth(&self.access_token)
                .query(query)
                .send()
                .await
                .with_context(|| format!("Request failed: {url}"))?;

            let now = Utc::now();
            let telemetry = RateLimitStatus::from_headers(response.headers(), now);
            if let Some(status) = telemetry {
                *self.rate_limit.lock().unwrap() = Some(status);
            }

            if rate_limit::is_rate_limited(response.status()) {
                if attempt >= MAX_RETRIES {
                    anyhow::bail!("Still rate limited after {MAX_RETRIES} retries: {url}");
                }
                attempt += 1;

                let wait = telemetry
                    .map(|status| status.delay_until_reset(now))
                    .filter(|wait| !wait.is_zero())
                    .unwrap_or(FALLBACK_BACKOFF);

                warn!(
                    wait_secs = wait.as_secs(),
                    attempt = attempt,
                    "Rate limited, sleeping until budget resets"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("{url} returned {status}: {body}");
            }

            return Ok(response);
        }
    }

    /// GET a single JSON entity.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.get_with_rate_limit(url, query).await?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize response from {url}"))
    }

    /// GET one page of a paginated collection.
    ///
    /// The Link header has to be read before the body is consumed.
    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Page<T>> {
        let response = self.get_with_rate_limit(url, query).await?;

        let next = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_next_link);

        let items = response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to deserialize page from {url}"))?;

        Ok(Page { items, next })
    }

    /// Follow a page's continuation, if it has one.
    async fn follow_next<T: DeserializeOwned>(&self, page: &Page<T>) -> Result<Option<Page<T>>> {
        match &page.next {
            Some(url) => Ok(Some(self.get_page(url, &[]).await?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl MastodonApi for MastodonClient {
    async fn verify_credentials(&self) -> Result<Account> {
        self.get_json(&self.api_url("accounts/verify_credentials"), &[])
            .await
            .context("Identity lookup failed (check MASTODON_ACCESS_TOKEN and instance URL)")
    }

    async fn lookup_account(&self, acct: &str) -> Result<Account> {
        self.get_json(&self.api_url("accounts/lookup"), &[("acct", acct)])
            .await
            .with_context(|| format!("Failed to look up account {acct}"))
    }

    async fn following_page(&self, account_id: &str) -> Result<Page<Account>> {
        let limit = FOLLOWING_PAGE_SIZE.to_string();
        self.get_page(
            &self.api_url(&format!("accounts/{account_id}/following")),
            &[("limit", limit.as_str())],
        )
        .await
        .with_context(|| format!("Failed to fetch following list for account {account_id}"))
    }

    async fn next_following_page(&self, page: &Page<Account>) -> Result<Option<Page<Account>>> {
        self.follow_next(page).await
    }

    async fn statuses_page(&self, account_id: &str, limit: usize) -> Result<Page<Status>> {
        let limit = limit.to_string();
        self.get_page(
            &self.api_url(&format!("accounts/{account_id}/statuses")),
            &[("limit", limit.as_str())],
        )
        .await
        .with_context(|| format!("Failed to fetch statuses for account {account_id}"))
    }

    async fn next_statuses_page(&self, page: &Page<Status>) -> Result<Option<Page<Status>>> {
        self.follow_next(page).await
    }

    fn rate_limit(&self) -> Option<RateLimitStatus> {
        *self.rate_limit.lock().unwrap()
    }
}

/// Extract the rel="next" URL from an RFC 5988 Link header value.
///
/// Mastodon sends something like:
///   <https://host/api/v1/...?max_id=123>; rel="next", <...>; rel="prev"
pub fn parse_next_link(header: &str) -> Option<String> {
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if is_next {
            return Some(
                target
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_link_extracted_from_full_header() {
        let header = "<https://chaos.social/api/v1/accounts/1/statuses?max_id=99>; rel=\"next\", \
                      <https://chaos.social/api/v1/accounts/1/statuses?since_id=200>; rel=\"prev\"";
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://chaos.social/api/v1/accounts/1/statuses?max_id=99")
        );
    }

    #[test]
    fn next_link_found_when_listed_second() {
        let header = "<https://host/prev>; rel=\"prev\", <https://host/next>; rel=\"next\"";
        assert_eq!(parse_next_link(header).as_deref(), Some("https://host/next"));
    }

    #[test]
    fn unquoted_rel_is_accepted() {
        let header = "<https://host/next>; rel=next";
        assert_eq!(parse_next_link(header).as_deref(), Some("https://host/next"));
    }

    #[test]
    fn prev_only_header_yields_none() {
        let header = "<https://host/prev>; rel=\"prev\"";
        assert!(parse_next_link(header).is_none());
    }

    #[test]
    fn empty_header_yields_none() {
        assert!(parse_next_link("").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = MastodonClient::new("https://chaos.social/", "token").unwrap();
        assert_eq!(
            client.api_url("accounts/lookup"),
            "https://chaos.social/api/v1/accounts/lookup"
        );
    }
}
