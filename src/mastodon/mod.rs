// Mastodon REST API layer.
//
// `client` is the authenticated HTTP wrapper, `rate_limit` owns the
// budget telemetry and wait-on-429 contract, `traits` defines the seam
// the collectors in `accounts` and `statuses` are written against.

pub mod accounts;
pub mod client;
pub mod rate_limit;
pub mod statuses;
pub mod traits;
