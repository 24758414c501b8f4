//! Output module for crawl reports and stored-site summaries
//!
//! This module handles:
//! - The completion report of a crawl run (counters and per-page outcomes)
//! - Summaries of the aggregates already present in a destination

mod report;
mod summary;

pub use report::{format_report, print_report, CrawlReport, PageReport};
pub use summary::{load_site_summaries, print_site_summaries, SiteSummary};
