//! Text analytics report
//!
//! One `key: value` line per field, in a fixed order, followed by a blank
//! line:
//!
//! ```text
//! subdomain_count: {"www.ics.uci.edu": 12}
//! most_outlinks: {"url": "http://www.ics.uci.edu/", "count": 40}
//! downloaded_urls_count: 12
//! downloaded_urls: ["http://www.ics.uci.edu/", ...]
//! identified_traps_count: 3
//! identified_traps: [{"url": "...", "reason": "..."}, ...]
//! longest_page: {"url": "...", "count": 2048}
//! top_50_words: [("research", 31), ...]
//! ```

use crate::analytics::{AnalyticsReport, Extremum, RedirectKind};
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Formats a report as text
pub fn format_report(report: &AnalyticsReport) -> String {
    let traps = report
        .identified_traps
        .iter()
        .map(|trap| {
            format!(
                "{{\"url\": {:?}, \"reason\": {:?}}}",
                trap.url,
                trap.reason.to_string()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut text = String::new();
    text.push_str(&format!("subdomain_count: {:?}\n", report.subdomain_count));
    text.push_str(&format!(
        "most_outlinks: {}\n",
        format_extremum(&report.most_outlinks)
    ));
    text.push_str(&format!(
        "downloaded_urls_count: {}\n",
        report.downloaded_urls_count()
    ));
    text.push_str(&format!("downloaded_urls: {:?}\n", report.downloaded_urls));
    text.push_str(&format!(
        "identified_traps_count: {}\n",
        report.identified_traps_count()
    ));
    text.push_str(&format!("identified_traps: [{}]\n", traps));
    text.push_str(&format!(
        "longest_page: {}\n",
        format_extremum(&report.longest_page)
    ));
    text.push_str(&format!("top_50_words: {:?}\n", report.top_50_words));
    text.push('\n');
    text
}

fn format_extremum(record: &Extremum) -> String {
    let url = match &record.url {
        Some(url) => format!("{:?}", url),
        None => "null".to_string(),
    };
    format!("{{\"url\": {}, \"count\": {}}}", url, record.count)
}

/// Writes the report to `output_path`, replacing any existing file
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to create or write the file
pub fn write_report(report: &AnalyticsReport, output_path: &Path) -> OutputResult<()> {
    let text = format_report(report);

    let mut file = File::create(output_path).map_err(|e| {
        OutputError::Write(format!("cannot create {}: {}", output_path.display(), e))
    })?;
    file.write_all(text.as_bytes())?;

    Ok(())
}

/// Prints a short summary of the report
pub fn print_summary(report: &AnalyticsReport) {
    println!("=== Crawl Analytics ===\n");

    println!("Overview:");
    println!("  Pages downloaded: {}", report.downloaded_urls_count());
    println!("  Subdomains visited: {}", report.subdomain_count.len());
    println!("  Traps identified: {}", report.identified_traps_count());
    let refreshes = report
        .redirects
        .iter()
        .filter(|r| r.kind == RedirectKind::Refresh)
        .count();
    println!(
        "  Redirects: {} ({} meta refresh)",
        report.redirects.len(),
        refreshes
    );
    println!();

    if let Some(url) = &report.longest_page.url {
        println!("Longest page: {} ({} words)", url, report.longest_page.count);
    }
    if let Some(url) = &report.most_outlinks.url {
        println!(
            "Most outlinks: {} ({} links)",
            url, report.most_outlinks.count
        );
    }

    if !report.top_50_words.is_empty() {
        println!("\nTop words:");
        for (word, count) in report.top_50_words.iter().take(10) {
            println!("  {}: {}", word, count);
        }
    }
}
