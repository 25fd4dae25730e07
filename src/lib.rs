// Fedistats: posting-frequency statistics for Mastodon.
//
// This is the library root. `mastodon` talks to the instance's REST API,
// `stats` turns fetched statuses into ranked per-account counts, and
// `output` renders the report.

pub mod config;
pub mod mastodon;
pub mod output;
pub mod stats;
