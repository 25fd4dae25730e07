use std::env;

use anyhow::Result;

/// Default instance to query when MASTODON_INSTANCE_URL is not set.
pub const DEFAULT_INSTANCE_URL: &str = "https://chaos.social";

/// How many statuses to fetch per account before counting.
pub const DEFAULT_STATUS_LIMIT: usize = 120;

/// Trailing window, in days, over which posts are counted.
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy. Verbosity lives
/// here rather than in any global flag — the config is built once
/// and passed by reference.
pub struct Config {
    /// Base URL of the Mastodon instance, e.g. https://chaos.social
    pub instance_url: String,
    /// OAuth access token for the authenticated account (MASTODON_ACCESS_TOKEN)
    pub access_token: String,
    /// Max statuses fetched per account (may be exceeded by one server page)
    pub status_limit: usize,
    /// Trailing window in days
    pub window_days: u32,
    /// Echo per-account progress and rate-limit telemetry during the run
    pub verbose: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything except the access token has a default; the token is
    /// validated separately via `require_token` so that `--help` and
    /// argument errors never depend on it.
    pub fn load() -> Result<Self> {
        let status_limit = match env::var("FEDISTATS_LIMIT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("FEDISTATS_LIMIT is not a number: {raw}"))?,
            Err(_) => DEFAULT_STATUS_LIMIT,
        };

        let window_days = match env::var("FEDISTATS_WINDOW_DAYS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("FEDISTATS_WINDOW_DAYS is not a number: {raw}"))?,
            Err(_) => DEFAULT_WINDOW_DAYS,
        };

        Ok(Self {
            instance_url: env::var("MASTODON_INSTANCE_URL")
                .unwrap_or_else(|_| DEFAULT_INSTANCE_URL.to_string()),
            access_token: env::var("MASTODON_ACCESS_TOKEN").unwrap_or_default(),
            status_limit,
            window_days,
            verbose: false,
        })
    }

    /// Check that the access token is configured.
    /// Call this before constructing the client — no network activity
    /// should happen without a credential.
    pub fn require_token(&self) -> Result<()> {
        if self.access_token.is_empty() {
            anyhow::bail!(
                "MASTODON_ACCESS_TOKEN not set. Export it or add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}
