//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - Content extraction from HTML documents
//! - The breadth-first frontier and the visited set
//! - Overall crawl coordination

mod controller;
mod extractor;
mod fetcher;
mod frontier;

pub use controller::{run_crawl, AdmittedSeed, Controller, CrawlRequest, CrawlSettings};
pub use extractor::{extract, extract_html, ContentRecord};
pub use fetcher::{
    build_http_client, user_agent_string, FetchError, FetchFailure, FetchedPage, Fetcher,
    HttpFetcher,
};
pub use frontier::{Frontier, VisitedSet};
