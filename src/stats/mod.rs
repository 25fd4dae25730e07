// Stats pipeline — the per-account fetch-and-count loop.
//
// Accounts are processed strictly one at a time; every page fetch
// blocks the whole run, and the client may sleep inside a fetch when
// the API budget is exhausted. Enumeration order only affects progress
// echo — the final report is re-ranked by count.

pub mod aggregate;
pub mod report;

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::mastodon::accounts::Account;
use crate::mastodon::statuses::fetch_statuses;
use crate::mastodon::traits::MastodonApi;

pub use aggregate::{count_recent_original_posts, rank_accounts, PostCount};
pub use report::build_report;

/// Fetch, count, and rank posting stats for the given accounts.
///
/// For each account: fetch up to `limit` recent statuses, count the
/// original posts inside the trailing window, and record the count
/// under the account's username. Any fetch failure aborts the whole
/// run — there is no partial report. When `verbose`, each account
/// completion is echoed together with the server's rate-limit
/// telemetry.
pub async fn run(
    api: &dyn MastodonApi,
    accounts: &[Account],
    limit: usize,
    window_days: u32,
    verbose: bool,
) -> Result<Vec<PostCount>> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    let progress = ProgressBar::new(accounts.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for (i, account) in accounts.iter().enumerate() {
        progress.set_message(format!("@{}", account.acct));

        let statuses = fetch_statuses(api, &account.id, limit).await?;
        let count = count_recent_original_posts(&statuses, Utc::now(), window_days);
        counts.insert(account.username.clone(), count);

        debug!(
            username = %account.username,
            fetched = statuses.len(),
            count = count,
            "Counted recent original posts"
        );

        if verbose {
            progress.println(progress_line(i + 1, accounts.len(), api.rate_limit()));
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    Ok(rank_accounts(counts))
}

/// One verbose progress line: completion counter plus the server's
/// advertised call budget.
fn progress_line(
    done: usize,
    total: usize,
    telemetry: Option<crate::mastodon::rate_limit::RateLimitStatus>,
) -> String {
    match telemetry {
        Some(status) => format!(
            "Done: {done:3}/{total} Limit: {:3} / {} Lastcall: {} Reset: {}",
            status.remaining,
            status.limit,
            status.last_call.format("%Y-%m-%d %H:%M:%S"),
            status.reset.format("%Y-%m-%d %H:%M:%S"),
        ),
        None => format!("Done: {done:3}/{total}"),
    }
}
