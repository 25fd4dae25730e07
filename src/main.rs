use anyhow::Result;
use clap::Parser;
use tracing::info;

use fedistats::config::Config;
use fedistats::mastodon::accounts::fetch_all_following;
use fedistats::mastodon::client::MastodonClient;
use fedistats::mastodon::traits::MastodonApi;
use fedistats::{output, stats};

/// Fedistats: posting-frequency statistics for Mastodon.
///
/// Without an argument, reports on every account you follow. With one
/// argument (user@server), reports on that single account.
#[derive(Debug, Parser)]
#[command(name = "fedistats", version, about)]
struct Cli {
    /// Account to report on (user@server). Omit to cover everyone you follow.
    acct: Option<String>,

    /// Trailing window in days (overrides FEDISTATS_WINDOW_DAYS)
    #[arg(long)]
    days: Option<u32>,

    /// Max statuses fetched per account (overrides FEDISTATS_LIMIT)
    #[arg(long)]
    limit: Option<usize>,

    /// Echo per-account progress and rate-limit telemetry
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fedistats=warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(days) = cli.days {
        config.window_days = days;
    }
    if let Some(limit) = cli.limit {
        config.status_limit = limit;
    }
    config.verbose = cli.verbose;

    if config.window_days == 0 {
        anyhow::bail!("The window must be at least one day (--days 0 makes every rate undefined)");
    }

    // No network activity without a credential
    config.require_token()?;

    let client = MastodonClient::new(&config.instance_url, &config.access_token)?;

    let targets = match cli.acct {
        Some(acct) => {
            let acct = acct.strip_prefix('@').unwrap_or(&acct);
            info!(acct = acct, "Resolving single account");
            vec![client.lookup_account(acct).await?]
        }
        None => {
            info!("Enumerating followed accounts");
            fetch_all_following(&client).await?
        }
    };

    if config.verbose {
        println!(
            "{}",
            output::terminal::preamble(config.window_days, targets.len(), &config.instance_url)
        );
    }

    let ranked = stats::run(
        &client,
        &targets,
        config.status_limit,
        config.window_days,
        config.verbose,
    )
    .await?;

    output::terminal::print_report(&ranked, config.window_days);

    Ok(())
}
