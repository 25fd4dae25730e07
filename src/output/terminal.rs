// Colored terminal output for the posting-stats report.

use colored::Colorize;

use crate::stats::{build_report, PostCount};

/// Print the ranked report: a bold header line naming the window,
/// then one line per account in rank order.
pub fn print_report(ranked: &[PostCount], window_days: u32) {
    let lines = build_report(ranked, window_days);
    let mut lines = lines.into_iter();

    if let Some(header) = lines.next() {
        println!("{}", header.bold());
    }
    for line in lines {
        println!("{line}");
    }

    if ranked.is_empty() {
        println!("{}", "No accounts to report on.".dimmed());
    }
}

/// One-line run preamble, shown only in verbose mode so that normal
/// stdout is exactly the report.
pub fn preamble(window_days: u32, account_count: usize, instance_url: &str) -> String {
    format!(
        "Counting posts from the last {window_days} days for {account_count} account(s) on {instance_url}..."
    )
}
