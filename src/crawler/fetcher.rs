//! Page fetching
//!
//! The crawl controller only depends on the [`Fetcher`] trait: given a URL it
//! returns a document body or a structured [`FetchError`]. [`HttpFetcher`] is
//! the reqwest-backed implementation used by the command-line tool; tests
//! inject their own fetchers.

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirects followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value (empty if absent)
    pub content_type: String,

    /// Page body content
    pub body: String,
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request did not complete within the fetcher's timeout
    Timeout,

    /// The connection could not be established
    Connect(String),

    /// The server answered with a non-success status
    Status(u16),

    /// The response body could not be read or decoded
    Body(String),

    /// Any other transport failure
    Other(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect(e) => write!(f, "connection failed: {}", e),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Body(e) => write!(f, "failed to read body: {}", e),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

/// A failed fetch, tagged with the URL that was requested
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error fetching {url}: {reason}")]
pub struct FetchError {
    /// The requested URL
    pub url: String,

    /// The failure reason
    pub reason: FetchFailure,
}

impl FetchError {
    /// Creates a fetch error for `url`
    pub fn new(url: &Url, reason: FetchFailure) -> Self {
        Self {
            url: url.to_string(),
            reason,
        }
    }
}

/// Capability to retrieve a document for a URL
///
/// Implementations must bound every fetch with a timeout; the controller
/// never retries a failed fetch.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the document at `url`
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Formats the user agent string sent with every request
///
/// Format: `CrawlerName/Version (+ContactURL)`, or `CrawlerName/Version`
/// when no contact URL is configured
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact_url) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact_url
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - The crawler configuration holding the timeouts
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitescrape::config::Config;
/// use sitescrape::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the user agent and crawler configuration
    pub fn new(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, crawler)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a URL with a single GET
    ///
    /// # Failure Mapping
    ///
    /// | Condition | Failure |
    /// |-----------|---------|
    /// | Non-2xx status | `Status(code)` |
    /// | Timeout | `Timeout` |
    /// | Connection refused, DNS, TLS | `Connect` |
    /// | Body read/decode error | `Body` |
    /// | Anything else | `Other` |
    ///
    /// The Content-Type is recorded but not enforced.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::new(url, classify_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, FetchFailure::Status(status.as_u16())));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await.map_err(|e| {
            let reason = if e.is_timeout() {
                FetchFailure::Timeout
            } else {
                FetchFailure::Body(e.to_string())
            };
            FetchError::new(url, reason)
        })?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Classifies a transport error into a [`FetchFailure`]
fn classify_error(e: &reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Connect(e.to_string())
    } else if let Some(status) = e.status() {
        FetchFailure::Status(status.as_u16())
    } else {
        FetchFailure::Other(e.to_string())
    }
}
