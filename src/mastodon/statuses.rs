// Status entities and limit-bounded status collection.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::traits::MastodonApi;

/// A single status (post) — just the fields needed for counting.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub id: String,
    /// Publication instant, time-zone aware.
    pub created_at: DateTime<Utc>,
    /// Some(parent id) when the status is a reply; None for originals.
    pub in_reply_to_id: Option<String>,
}

impl Status {
    /// True when the status is not a reply to anything.
    pub fn is_original(&self) -> bool {
        self.in_reply_to_id.is_none()
    }
}

/// Fetch up to `limit` of an account's most recent statuses.
///
/// Requests an initial page sized to the hint, then follows
/// continuations until the accumulated count reaches `limit` or the
/// server runs out of pages. Page sizes are server-controlled, so the
/// result may overshoot `limit` by up to one page — that is accepted,
/// not truncated. No request is ever issued after an empty page.
pub async fn fetch_statuses(
    api: &dyn MastodonApi,
    account_id: &str,
    limit: usize,
) -> Result<Vec<Status>> {
    let mut current = api.statuses_page(account_id, limit).await?;
    let mut statuses = std::mem::take(&mut current.items);

    while !statuses.is_empty() && statuses.len() < limit {
        let Some(mut page) = api.next_statuses_page(&current).await? else {
            break;
        };
        if page.items.is_empty() {
            break;
        }

        statuses.append(&mut page.items);
        current = page;

        debug!(
            total = statuses.len(),
            account_id = account_id,
            "Fetched page of statuses"
        );
    }

    info!(
        count = statuses.len(),
        account_id = account_id,
        "Collected statuses"
    );

    Ok(statuses)
}
