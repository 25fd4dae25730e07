// Report formatting — ranked counts to printable lines.

use super::aggregate::PostCount;

/// Format the ranked counts as report lines, header first.
///
/// Each entry's rate is count / window_days as floating-point division;
/// a zero-day window is a configuration error caught before this point.
pub fn build_report(ranked: &[PostCount], window_days: u32) -> Vec<String> {
    let mut lines = Vec::with_capacity(ranked.len() + 1);
    lines.push(format!(
        "Posts that were not replies of the last {window_days} days:"
    ));

    for entry in ranked {
        let average = entry.count as f64 / f64::from(window_days);
        lines.push(format!(
            "{}: {} posts. Average {average:.3} a day.",
            entry.username, entry.count
        ));
    }

    lines
}
