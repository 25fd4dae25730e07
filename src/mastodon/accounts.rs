// Account entities and following-list collection.
//
// The following list is walked to exhaustion — an individual's follow
// count is always enumerable, so no safety cap is applied (unlike the
// per-account status fetch, which is bounded).

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::traits::MastodonApi;

/// A Mastodon account — just the fields fedistats needs.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Server-assigned opaque identifier.
    pub id: String,
    /// Local username; the aggregation key for the report.
    pub username: String,
    /// Webfinger-style handle (`user` locally, `user@server` remote).
    pub acct: String,
    #[serde(default)]
    pub display_name: String,
}

/// Fetch every account the authenticated user follows.
///
/// Resolves the user's own id first, then pages through the following
/// endpoint until the server stops handing out continuations. A failed
/// identity lookup propagates as an authentication/connectivity error.
pub async fn fetch_all_following(api: &dyn MastodonApi) -> Result<Vec<Account>> {
    let me = api
        .verify_credentials()
        .await
        .context("Could not resolve the authenticated account")?;

    debug!(id = %me.id, username = %me.username, "Resolved authenticated account");

    let mut accounts = Vec::new();
    let mut current = api.following_page(&me.id).await?;

    loop {
        if current.items.is_empty() {
            break;
        }

        let next = api.next_following_page(&current).await?;
        accounts.append(&mut current.items);

        debug!(total = accounts.len(), "Fetched page of followed accounts");

        match next {
            Some(page) => current = page,
            None => break,
        }
    }

    info!(count = accounts.len(), "Collected following list");

    Ok(accounts)
}
