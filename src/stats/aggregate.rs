// Windowed counting and ranking — pure functions over fetched data.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::mastodon::statuses::Status;

/// One account's qualifying-post count. The ranked `Vec<PostCount>` is
/// the run's only output artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCount {
    pub username: String,
    pub count: usize,
}

/// Count the statuses that are original posts within the trailing window.
///
/// The window's lower bound is `as_of - window_days`, exclusive: a
/// status created exactly at the bound does not qualify. Replies never
/// qualify, regardless of timestamp.
pub fn count_recent_original_posts(
    statuses: &[Status],
    as_of: DateTime<Utc>,
    window_days: u32,
) -> usize {
    let threshold = as_of - Duration::days(i64::from(window_days));
    statuses
        .iter()
        .filter(|status| status.created_at > threshold && status.is_original())
        .count()
}

/// Order per-account counts descending by count.
///
/// Ties break by username ascending — the ordering among equal counts
/// is otherwise unspecified, and a deterministic key keeps runs
/// comparable.
pub fn rank_accounts(counts: HashMap<String, usize>) -> Vec<PostCount> {
    let mut ranked: Vec<PostCount> = counts
        .into_iter()
        .map(|(username, count)| PostCount { username, count })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.username.cmp(&b.username))
    });
    ranked
}
