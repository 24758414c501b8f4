//! sitescrape main entry point
//!
//! This is the command-line interface for the sitescrape content scraper.

use anyhow::{bail, Context};
use clap::Parser;
use sitescrape::config::{load_config_or_default, override_politeness_delay, Config};
use sitescrape::output::{load_site_summaries, print_report, print_site_summaries};
use sitescrape::store::open_store;
use sitescrape::{run_crawl, CrawlRequest};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// sitescrape: a breadth-first content scraper
///
/// Fetches the seed pages, extracts headings, paragraphs, list items, links
/// and images, follows every link found, and stores the results as one JSON
/// file per site.
#[derive(Parser, Debug)]
#[command(name = "sitescrape")]
#[command(version)]
#[command(about = "A breadth-first content scraper", long_about = None)]
struct Cli {
    /// Seed URLs, separated by commas or spaces
    #[arg(value_name = "URLS")]
    urls: Vec<String>,

    /// Number of seeds to admit, counted from the first one
    #[arg(short = 'n', long)]
    budget: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving the per-site JSON files
    #[arg(short = 'o', long, value_name = "DIR")]
    destination: Option<PathBuf>,

    /// Pause between two fetches, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the request and show what would be crawled without crawling
    #[arg(long, conflicts_with = "summary")]
    dry_run: bool,

    /// Show the sites stored in the destination and exit
    #[arg(long, conflicts_with = "dry_run")]
    summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let (mut config, config_hash) = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(hash) = config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    if let Some(delay_ms) = cli.delay_ms {
        override_politeness_delay(&mut config, delay_ms).context("Invalid --delay-ms")?;
    }

    let destination = cli
        .destination
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.destination));

    if cli.summary {
        return handle_summary(&destination);
    }

    let request = build_request(&cli, &config, destination)?;

    if cli.dry_run {
        handle_dry_run(&config, &request)
    } else {
        handle_crawl(&config, request).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitescrape=info,warn"),
            1 => EnvFilter::new("sitescrape=debug,info"),
            2 => EnvFilter::new("sitescrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the crawl request from the command line, falling back to the
/// `[seeds]` section of the configuration
fn build_request(
    cli: &Cli,
    config: &Config,
    destination: PathBuf,
) -> anyhow::Result<CrawlRequest> {
    let seeds: Vec<String> = if cli.urls.is_empty() {
        config.seeds.urls.clone()
    } else {
        cli.urls
            .iter()
            .flat_map(|arg| CrawlRequest::parse_seeds(arg))
            .collect()
    };

    if seeds.is_empty() {
        bail!("No seed URLs given; pass them as arguments or in the [seeds] section");
    }

    let budget = cli.budget.or(config.seeds.budget).unwrap_or(1);
    Ok(CrawlRequest::new(seeds, budget, destination))
}

/// Handles the --dry-run mode: validates the request and shows the plan
fn handle_dry_run(config: &Config, request: &CrawlRequest) -> anyhow::Result<()> {
    let admitted = request
        .admitted_seeds()
        .context("Invalid crawl request")?;

    println!("=== sitescrape Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay_ms
    );
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!(
        "  Connect timeout: {}s",
        config.crawler.connect_timeout_secs
    );

    println!("\nUser Agent:");
    println!(
        "  {}",
        sitescrape::crawler::user_agent_string(&config.user_agent)
    );

    println!("\nOutput:");
    println!("  Destination: {}", request.destination.display());

    println!(
        "\nSeeds ({} given, budget {}):",
        request.seeds.len(),
        request.budget
    );
    for (i, seed) in request.seeds.iter().enumerate() {
        match admitted.get(i).map(|s| &s.url) {
            Some(Ok(url)) => println!("  * {}", url),
            Some(Err(e)) => println!("  ! {} (will fail: {})", seed, e),
            None => println!("    {} (not admitted)", seed),
        }
    }

    let invalid = admitted.iter().filter(|s| s.url.is_err()).count();
    println!("\n✓ Request is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        admitted.len() - invalid
    );
    if invalid > 0 {
        println!("⚠ {} admitted seed(s) are not valid URLs", invalid);
    }

    Ok(())
}

/// Handles the --summary mode: shows the sites stored in the destination
fn handle_summary(destination: &Path) -> anyhow::Result<()> {
    println!("Destination: {}\n", destination.display());

    let store = open_store(destination);
    let summaries = load_site_summaries(&store)
        .with_context(|| format!("Failed to read {}", destination.display()))?;

    print_site_summaries(&summaries);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, request: CrawlRequest) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, budget: {}, delay: {}ms",
        request.seeds.len(),
        request.budget,
        config.crawler.politeness_delay_ms
    );

    // Ctrl-C cancels the crawl; pages already stored are kept
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            signal_token.cancel();
        }
    });

    match run_crawl(config, request, cancel).await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
