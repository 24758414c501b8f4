//! Crawl completion report
//!
//! The controller records one [`PageReport`] per processed URL; the counters
//! are kept in step so callers can read totals without walking the outcomes.

use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// What happened to a single dequeued URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Canonical URL of the page
    pub url: String,

    /// Final outcome
    pub outcome: PageOutcome,

    /// Number of resolved links appended to the frontier
    pub links_enqueued: usize,

    /// Failure reason for fetch and persist failures
    pub error: Option<String>,
}

/// Summary of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Number of distinct URLs processed (fetched, successfully or not)
    pub pages_visited: usize,

    /// Pages whose record reached the store
    pub pages_stored: usize,

    /// Pages that could not be fetched
    pub fetch_failures: usize,

    /// Pages that were extracted but not persisted
    pub persist_failures: usize,

    /// Links dropped because they did not resolve to an http(s) URL
    pub links_discarded: usize,

    /// Whether the run was cancelled before the frontier drained
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Per-page outcomes in processing order
    pub outcomes: Vec<PageReport>,
}

impl CrawlReport {
    /// Creates an empty report for a run starting now
    pub fn new() -> Self {
        Self {
            pages_visited: 0,
            pages_stored: 0,
            fetch_failures: 0,
            persist_failures: 0,
            links_discarded: 0,
            cancelled: false,
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    /// Records the outcome of a page and updates the counters
    pub fn record(&mut self, page: PageReport) {
        if page.outcome.counts_as_visited() {
            self.pages_visited += 1;
        }
        match page.outcome {
            PageOutcome::Stored => self.pages_stored += 1,
            PageOutcome::FetchFailed => self.fetch_failures += 1,
            PageOutcome::PersistFailed => self.persist_failures += 1,
            PageOutcome::Abandoned => {}
        }
        self.outcomes.push(page);
    }

    /// Marks the report as finished
    pub fn finish(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
        self.finished_at = Some(Utc::now());
    }

    /// Returns the run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Returns the share of visited pages that were stored, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        (self.pages_stored as f64 / self.pages_visited as f64) * 100.0
    }

    /// Returns the outcomes that ended in an error
    pub fn failures(&self) -> impl Iterator<Item = &PageReport> {
        self.outcomes.iter().filter(|p| p.outcome.is_error())
    }

    /// The one-line completion message shown to users
    pub fn completion_message(&self) -> String {
        format!(
            "Scraping completed! Total pages scraped: {}",
            self.pages_visited
        )
    }
}

impl Default for CrawlReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats a crawl report for the terminal
pub fn format_report(report: &CrawlReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Report ===\n");
    let _ = writeln!(out, "Started: {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        let _ = writeln!(out, "Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = report.duration_seconds() {
        let _ = writeln!(out, "Duration: {:.1}s", duration);
    }
    if report.cancelled {
        let _ = writeln!(out, "Status: cancelled");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Pages:");
    let _ = writeln!(out, "  Visited: {}", report.pages_visited);
    let _ = writeln!(
        out,
        "  Stored: {} ({:.1}%)",
        report.pages_stored,
        report.success_rate()
    );
    let _ = writeln!(out, "  Fetch failures: {}", report.fetch_failures);
    let _ = writeln!(out, "  Persist failures: {}", report.persist_failures);
    let _ = writeln!(out, "  Links discarded: {}", report.links_discarded);

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        let _ = writeln!(out, "\nFailures:");
        for page in failures {
            let _ = writeln!(
                out,
                "  [{}] {}: {}",
                page.outcome,
                page.url,
                page.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let _ = writeln!(out, "\n{}", report.completion_message());
    out
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
