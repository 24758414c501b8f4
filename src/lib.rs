//! sitescrape: a breadth-first content scraper
//!
//! This crate crawls a seed set of web pages, extracts headings, paragraphs,
//! list items, links and image sources from each page, and persists the
//! results into one JSON aggregate per site. Links found on a page are
//! resolved against it and followed.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod store;
pub mod url;

use thiserror::Error;

pub use crawler::FetchError;
pub use store::StoreError;

/// Coarse classification of a [`CrawlError`]
///
/// Callers branch on this instead of parsing error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or HTTP failure; the page is skipped
    Fetch,
    /// A discovered link could not be resolved; the link is discarded
    Resolution,
    /// Reading or writing a site aggregate failed
    Persistence,
    /// The crawl request or configuration is invalid; the run never starts
    Configuration,
}

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Cannot resolve link '{href}' on {base}: {source}")]
    Resolution {
        base: String,
        href: String,
        source: UrlError,
    },

    #[error("Failed to persist {url}: {source}")]
    Persistence { url: String, source: StoreError },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl CrawlError {
    /// Returns the kind tag of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) | Self::Client(_) => ErrorKind::Configuration,
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::Resolution { .. } => ErrorKind::Resolution,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    /// Returns the URL the error is about, if there is one
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Config(ConfigError::InvalidUrl(url)) => Some(url.as_str()),
            Self::Config(_) | Self::Client(_) => None,
            Self::Fetch(e) => Some(e.url.as_str()),
            Self::Resolution { base, .. } => Some(base.as_str()),
            Self::Persistence { url, .. } => Some(url.as_str()),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, ContentRecord, Controller, CrawlRequest};
pub use output::CrawlReport;
pub use state::{CrawlPhase, PageOutcome};
pub use crate::url::{normalize_url, page_key, resolve, site_key};
