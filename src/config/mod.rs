//! Configuration module
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a crawl can run without
//! any file at all.
//!
//! # Example
//!
//! ```no_run
//! use sitescrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitescrape.toml")).unwrap();
//! println!("Politeness delay: {}ms", config.crawler.politeness_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SeedConfig, UserAgentConfig,
    DEFAULT_POLITENESS_DELAY_MS,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_or_default, load_config_with_hash,
    parse_config,
};

pub use validation::{override_politeness_delay, validate};
