//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Lifecycle of a single crawl run (idle, running, draining, done)
//! - `PageOutcome`: What happened to an individual page once it was dequeued

mod crawl_phase;
mod page_outcome;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use page_outcome::PageOutcome;
