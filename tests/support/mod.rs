// Shared test support — an in-memory MastodonApi with call counting.
//
// Pages are linked automatically: page N carries a continuation to page
// N+1 when one exists. Counters only tick when a request would actually
// go over the wire, so tests can assert that no request follows an
// empty or absent page.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use fedistats::mastodon::accounts::Account;
use fedistats::mastodon::client::Page;
use fedistats::mastodon::rate_limit::RateLimitStatus;
use fedistats::mastodon::statuses::Status;
use fedistats::mastodon::traits::MastodonApi;

pub fn account(id: &str, username: &str) -> Account {
    Account {
        id: id.to_string(),
        username: username.to_string(),
        acct: username.to_string(),
        display_name: username.to_string(),
    }
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

pub fn original(id: &str, created_at: DateTime<Utc>) -> Status {
    Status {
        id: id.to_string(),
        created_at,
        in_reply_to_id: None,
    }
}

pub fn reply(id: &str, created_at: DateTime<Utc>, parent: &str) -> Status {
    Status {
        id: id.to_string(),
        created_at,
        in_reply_to_id: Some(parent.to_string()),
    }
}

#[derive(Default)]
pub struct MockApi {
    pub me: Option<Account>,
    pub following_pages: Vec<Vec<Account>>,
    pub status_pages: HashMap<String, Vec<Vec<Status>>>,
    /// Account ids whose status fetch fails unrecoverably.
    pub failing_accounts: Vec<String>,
    pub verify_calls: AtomicU32,
    pub lookup_calls: AtomicU32,
    pub following_calls: AtomicU32,
    pub status_calls: AtomicU32,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_me(mut self, me: Account) -> Self {
        self.me = Some(me);
        self
    }

    pub fn with_following_pages(mut self, pages: Vec<Vec<Account>>) -> Self {
        self.following_pages = pages;
        self
    }

    pub fn with_status_pages(mut self, account_id: &str, pages: Vec<Vec<Status>>) -> Self {
        self.status_pages.insert(account_id.to_string(), pages);
        self
    }

    pub fn with_failing_account(mut self, account_id: &str) -> Self {
        self.failing_accounts.push(account_id.to_string());
        self
    }

    /// Every request counter summed — the "did any network activity
    /// happen" assertion.
    pub fn total_requests(&self) -> u32 {
        self.verify_calls.load(Ordering::SeqCst)
            + self.lookup_calls.load(Ordering::SeqCst)
            + self.following_calls.load(Ordering::SeqCst)
            + self.status_calls.load(Ordering::SeqCst)
    }

    fn page_at<T: Clone>(pages: &[Vec<T>], index: usize, token_prefix: &str) -> Page<T> {
        let items = pages.get(index).cloned().unwrap_or_default();
        let next = if index + 1 < pages.len() {
            Some(format!("{token_prefix}/{}", index + 1))
        } else {
            None
        };
        Page { items, next }
    }

    fn token_index(token: &str) -> usize {
        token
            .rsplit('/')
            .next()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MastodonApi for MockApi {
    async fn verify_credentials(&self) -> Result<Account> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.me
            .clone()
            .ok_or_else(|| anyhow::anyhow!("401 Unauthorized: The access token is invalid"))
    }

    async fn lookup_account(&self, acct: &str) -> Result<Account> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.following_pages
            .iter()
            .flatten()
            .find(|account| account.acct == acct)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("404 Not Found: Record not found ({acct})"))
    }

    async fn following_page(&self, _account_id: &str) -> Result<Page<Account>> {
        self.following_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::page_at(&self.following_pages, 0, "following"))
    }

    async fn next_following_page(&self, page: &Page<Account>) -> Result<Option<Page<Account>>> {
        let Some(token) = &page.next else {
            return Ok(None);
        };
        self.following_calls.fetch_add(1, Ordering::SeqCst);
        let index = Self::token_index(token);
        Ok(Some(Self::page_at(&self.following_pages, index, "following")))
    }

    async fn statuses_page(&self, account_id: &str, _limit: usize) -> Result<Page<Status>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_accounts.iter().any(|id| id == account_id) {
            anyhow::bail!("503 Service Unavailable: statuses for {account_id}");
        }
        let pages = self.status_pages.get(account_id).cloned().unwrap_or_default();
        Ok(Self::page_at(&pages, 0, &format!("statuses/{account_id}")))
    }

    async fn next_statuses_page(&self, page: &Page<Status>) -> Result<Option<Page<Status>>> {
        let Some(token) = &page.next else {
            return Ok(None);
        };
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let account_id = token
            .strip_prefix("statuses/")
            .and_then(|rest| rest.rsplit_once('/'))
            .map(|(id, _)| id.to_string())
            .unwrap_or_default();
        let index = Self::token_index(token);
        let pages = self.status_pages.get(&account_id).cloned().unwrap_or_default();
        Ok(Some(Self::page_at(
            &pages,
            index,
            &format!("statuses/{account_id}"),
        )))
    }

    fn rate_limit(&self) -> Option<RateLimitStatus> {
        None
    }
}
