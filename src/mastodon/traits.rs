// The API seam between the collectors and HTTP.
//
// `MastodonApi` is object-safe so the collection loops and the stats
// run can be exercised against an in-memory mock (see tests/) — the
// mock also lets tests assert that no requests happen after an empty
// page or a terminated page walk.

use anyhow::Result;
use async_trait::async_trait;

use super::accounts::Account;
use super::client::Page;
use super::rate_limit::RateLimitStatus;
use super::statuses::Status;

/// The slice of the Mastodon REST API this tool consumes.
///
/// Implementations guarantee the rate-limit contract: a page fetch
/// either returns a page or blocks until budget replenishes — callers
/// never receive a rate-limit error.
#[async_trait]
pub trait MastodonApi: Send + Sync {
    /// Resolve the authenticated user's own account.
    async fn verify_credentials(&self) -> Result<Account>;

    /// Resolve a `user@server`-style handle to an account.
    async fn lookup_account(&self, acct: &str) -> Result<Account>;

    /// First page of the accounts a given account follows.
    async fn following_page(&self, account_id: &str) -> Result<Page<Account>>;

    /// Continuation of a following-list walk; None at the end.
    async fn next_following_page(&self, page: &Page<Account>) -> Result<Option<Page<Account>>>;

    /// First page of an account's statuses, sized to the given hint.
    async fn statuses_page(&self, account_id: &str, limit: usize) -> Result<Page<Status>>;

    /// Continuation of a status walk; None at the end.
    async fn next_statuses_page(&self, page: &Page<Status>) -> Result<Option<Page<Status>>>;

    /// Latest rate-limit telemetry, if the server has sent any.
    fn rate_limit(&self) -> Option<RateLimitStatus>;
}
