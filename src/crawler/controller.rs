//! Crawl controller - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other parts together:
//! - Validating the crawl request and admitting seeds into the frontier
//! - Popping URLs in breadth-first order and skipping visited ones
//! - Fetching, extracting and persisting each page
//! - Resolving discovered links and enqueueing the unseen ones
//! - Pacing fetches with a fixed politeness delay
//! - Stopping cooperatively when the cancellation token fires

use crate::config::{Config, CrawlerConfig};
use crate::crawler::extractor::{extract_html, ContentRecord};
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, VisitedSet};
use crate::output::{CrawlReport, PageReport};
use crate::state::{CrawlPhase, PageOutcome};
use crate::store::{JsonStore, Store};
use crate::url::{normalize_url, page_key, resolve, site_key};
use crate::{ConfigError, CrawlError, Result, UrlError, UrlResult};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Pages between two progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Input of a single crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Seed URLs in admission order
    pub seeds: Vec<String>,

    /// How many seeds, from the front, are admitted into the frontier
    pub budget: usize,

    /// Directory receiving the site aggregates
    pub destination: PathBuf,
}

impl CrawlRequest {
    /// Creates a crawl request
    pub fn new(seeds: Vec<String>, budget: usize, destination: impl Into<PathBuf>) -> Self {
        Self {
            seeds,
            budget,
            destination: destination.into(),
        }
    }

    /// Splits user input into seed URLs
    ///
    /// Seeds may be separated by commas, whitespace, or both. Empty entries
    /// are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use sitescrape::CrawlRequest;
    ///
    /// let seeds = CrawlRequest::parse_seeds("http://a.test/, http://b.test/");
    /// assert_eq!(seeds, vec!["http://a.test/", "http://b.test/"]);
    /// ```
    pub fn parse_seeds(input: &str) -> Vec<String> {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validates the request and returns the admitted seeds
    ///
    /// Only the count and the budget are checked here. Each of the first
    /// `budget` seeds is paired with its canonical form, or with the reason
    /// it has none; seeds past the budget are never looked at.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<AdmittedSeed>)` - The first `budget` seeds
    /// * `Err(ConfigError)` - No seeds, a zero budget, or a budget larger
    ///   than the seed list
    pub fn admitted_seeds(&self) -> std::result::Result<Vec<AdmittedSeed>, ConfigError> {
        if self.seeds.is_empty() {
            return Err(ConfigError::Validation(
                "at least one seed URL is required".to_string(),
            ));
        }

        if self.budget == 0 {
            return Err(ConfigError::Validation(
                "budget must be a positive integer".to_string(),
            ));
        }

        if self.budget > self.seeds.len() {
            return Err(ConfigError::Validation(format!(
                "budget {} exceeds the number of seeds ({})",
                self.budget,
                self.seeds.len()
            )));
        }

        Ok(self
            .seeds
            .iter()
            .take(self.budget)
            .map(|seed| AdmittedSeed {
                raw: seed.clone(),
                url: normalize_url(seed),
            })
            .collect())
    }
}

/// A seed inside the budget
///
/// A seed that does not canonicalize is still admitted; the run records it
/// as a failed page instead of fetching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmittedSeed {
    /// The seed as given
    pub raw: String,

    /// Canonical form, or why there is none
    pub url: UrlResult<Url>,
}

/// Tunables of the crawl loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Fixed pause between two fetches
    pub politeness_delay: Duration,
}

impl CrawlSettings {
    /// Builds settings from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            politeness_delay: Duration::from_millis(config.politeness_delay_ms),
        }
    }
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Main crawl controller
///
/// Owns the frontier and the visited set of one run. Several
/// controllers can run side by side; they share nothing.
pub struct Controller<F, S> {
    fetcher: F,
    store: S,
    settings: CrawlSettings,
    request: CrawlRequest,
    frontier: Frontier,
    visited: VisitedSet,
    invalid_seeds: Vec<(String, UrlError)>,
    phase: CrawlPhase,
    cancel: CancellationToken,
}

impl<F: Fetcher, S: Store> Controller<F, S> {
    /// Creates a new controller
    ///
    /// # Arguments
    ///
    /// * `request` - Seeds, budget and destination of the run
    /// * `fetcher` - Source of page bodies
    /// * `store` - Sink for content records
    /// * `settings` - Politeness delay
    ///
    /// # Returns
    ///
    /// * `Ok(Controller)` - Request validated, frontier seeded
    /// * `Err(CrawlError)` - Invalid request; nothing was fetched
    pub fn new(
        request: CrawlRequest,
        fetcher: F,
        store: S,
        settings: CrawlSettings,
    ) -> Result<Self> {
        let mut frontier = Frontier::new();
        let mut invalid_seeds: Vec<(String, UrlError)> = Vec::new();

        for seed in request.admitted_seeds()? {
            match seed.url {
                Ok(url) => frontier.push(url),
                Err(e) if !invalid_seeds.iter().any(|(raw, _)| *raw == seed.raw) => {
                    invalid_seeds.push((seed.raw, e))
                }
                Err(_) => {}
            }
        }

        Ok(Self {
            fetcher,
            store,
            settings,
            request,
            frontier,
            visited: VisitedSet::new(),
            invalid_seeds,
            phase: CrawlPhase::Idle,
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the cancellation token the run listens to
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a token that cancels this run when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns the current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Returns the number of URLs waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }

    /// Returns the store records are written to
    pub fn store(&self) -> &S {
        &self.store
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlError::Config(ConfigError::Validation(format!(
                "cannot move crawl from {} to {}",
                self.phase, next
            ))));
        }
        tracing::debug!("Crawl phase: {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Runs the crawl loop until the frontier is empty or the run is
    /// cancelled
    ///
    /// Per-page failures are recorded in the report and never end the run.
    /// A controller runs once; a second call is a configuration error.
    pub async fn run(&mut self) -> Result<CrawlReport> {
        if self.phase.is_terminal() {
            return Err(CrawlError::Config(ConfigError::Validation(
                "crawl already finished; a controller runs once".to_string(),
            )));
        }
        self.transition(CrawlPhase::Running)?;
        self.visited.clear();

        tracing::info!(
            "Starting crawl: {} seeds admitted (budget {}), writing to {}",
            self.frontier.len() + self.invalid_seeds.len(),
            self.request.budget,
            self.request.destination.display()
        );

        let mut report = CrawlReport::new();
        let start_time = Instant::now();

        // Admitted seeds that never became URLs fail without a fetch
        for (seed, e) in std::mem::take(&mut self.invalid_seeds) {
            tracing::warn!("Skipping seed {}: {}", seed, e);
            report.record(PageReport {
                url: seed,
                outcome: PageOutcome::FetchFailed,
                links_enqueued: 0,
                error: Some(e.to_string()),
            });
        }
        let mut fetched_any = false;
        let mut cancelled = false;

        loop {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let url = match self.frontier.pop() {
                Some(url) => url,
                None => break,
            };

            if self.visited.contains(&url) {
                tracing::debug!("Skipping already visited {}", url);
                continue;
            }

            // The delay separates two fetches; there is none before the
            // first one and none after the last one.
            if fetched_any && !self.settings.politeness_delay.is_zero() {
                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        cancelled = true;
                        break;
                    }
                    _ = tokio::time::sleep(self.settings.politeness_delay) => {}
                }
            }

            tracing::info!("Scraping {}...", url);
            fetched_any = true;

            let fetched = tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("Crawl cancelled while fetching {}", url);
                    report.record(PageReport {
                        url: url.to_string(),
                        outcome: PageOutcome::Abandoned,
                        links_enqueued: 0,
                        error: None,
                    });
                    cancelled = true;
                    break;
                }
                result = self.fetcher.fetch(&url) => result,
            };

            let page = match fetched {
                Ok(page) => self.process_page(&url, &page, &mut report),
                Err(e) => self.record_fetch_failure(&url, e),
            };

            self.visited.insert(url);
            report.record(page);

            if report.pages_visited % PROGRESS_INTERVAL == 0 {
                let elapsed = start_time.elapsed();
                let rate = report.pages_visited as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {:.2} pages/sec",
                    report.pages_visited,
                    self.frontier.len(),
                    rate
                );
            }
        }

        if cancelled {
            tracing::warn!(
                "Crawl cancelled with {} URLs left in the frontier",
                self.frontier.len()
            );
        } else {
            self.transition(CrawlPhase::Draining)?;
            tracing::info!("Frontier is empty, crawl complete");
        }
        self.transition(CrawlPhase::Done)?;

        report.finish(cancelled);
        tracing::info!(
            "Crawl finished: {} pages visited, {} stored in {:?}",
            report.pages_visited,
            report.pages_stored,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Extracts, persists and expands a fetched page
    fn process_page(
        &mut self,
        url: &Url,
        page: &FetchedPage,
        report: &mut CrawlReport,
    ) -> PageReport {
        if page.final_url != url.as_str() {
            tracing::debug!("{} redirected to {}", url, page.final_url);
        }
        let record = extract_html(&page.body);

        let (outcome, error) = match self.persist(url, &record) {
            Ok(()) => (PageOutcome::Stored, None),
            Err(e) => {
                tracing::warn!("{}", e);
                (PageOutcome::PersistFailed, Some(e.to_string()))
            }
        };

        // Links are followed even when persisting failed
        let links_enqueued = self.enqueue_links(url, &record.links, report);

        PageReport {
            url: url.to_string(),
            outcome,
            links_enqueued,
            error,
        }
    }

    fn persist(&self, url: &Url, record: &ContentRecord) -> Result<()> {
        self.store
            .persist(&site_key(url), &page_key(url), record)
            .map_err(|source| CrawlError::Persistence {
                url: url.to_string(),
                source,
            })
    }

    /// Resolves raw links against `base` and appends the unvisited ones
    ///
    /// Returns how many were appended.
    fn enqueue_links(
        &mut self,
        base: &Url,
        links: &[String],
        report: &mut CrawlReport,
    ) -> usize {
        let mut enqueued = 0;

        for href in links {
            let resolved = match resolve(base, href) {
                Ok(url) => url,
                Err(source) => {
                    let e = CrawlError::Resolution {
                        base: base.to_string(),
                        href: href.clone(),
                        source,
                    };
                    tracing::debug!("Discarding link: {}", e);
                    report.links_discarded += 1;
                    continue;
                }
            };

            if self.visited.contains(&resolved) {
                continue;
            }

            self.frontier.push(resolved);
            enqueued += 1;
        }

        tracing::debug!("Enqueued {} links from {}", enqueued, base);
        enqueued
    }

    fn record_fetch_failure(&self, url: &Url, e: FetchError) -> PageReport {
        tracing::warn!("{}", e);
        PageReport {
            url: url.to_string(),
            outcome: PageOutcome::FetchFailed,
            links_enqueued: 0,
            error: Some(e.reason.to_string()),
        }
    }
}

/// Runs a complete crawl against the network
///
/// Builds the HTTP fetcher and the JSON store from `config` and `request`,
/// then drives a [`Controller`] until the frontier drains or `cancel` fires.
///
/// # Arguments
///
/// * `config` - The crawler configuration (delay, timeouts, user agent)
/// * `request` - Seeds, budget and destination
/// * `cancel` - Token that stops the run cooperatively
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished or was cancelled
/// * `Err(CrawlError)` - The request or the HTTP client was invalid
///
/// # Example
///
/// ```no_run
/// use sitescrape::config::Config;
/// use sitescrape::{run_crawl, CrawlRequest};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let request = CrawlRequest::new(vec!["https://example.com/".to_string()], 1, "./out");
/// let report = run_crawl(&Config::default(), request, CancellationToken::new()).await?;
/// println!("{}", report.completion_message());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    request: CrawlRequest,
    cancel: CancellationToken,
) -> Result<CrawlReport> {
    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler)?;
    let store = JsonStore::new(&request.destination);
    let settings = CrawlSettings::from_config(&config.crawler);

    let mut controller =
        Controller::new(request, fetcher, store, settings)?.with_cancellation(cancel);
    controller.run().await
}
