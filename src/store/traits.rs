//! Store trait and error types
//!
//! This module defines the trait interface for persistence backends and
//! associated error types.

use crate::crawler::ContentRecord;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// All persisted pages of one site, keyed by page key
pub type SiteAggregate = BTreeMap<String, ContentRecord>;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Corrupt aggregate {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock poisoned for site {0}")]
    LockPoisoned(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for persistence backends
///
/// Implementations must make `persist` an upsert: the record replaces any
/// earlier record stored under the same `(site_key, page_key)`, and other
/// pages of the site are kept. Implementations are shared by reference, so
/// they serialize their own read-modify-write cycles.
pub trait Store: Send + Sync {
    /// Stores `record` under `page_key` in the aggregate of `site_key`
    ///
    /// # Arguments
    ///
    /// * `site_key` - Key of the site aggregate (see [`crate::url::site_key`])
    /// * `page_key` - Key of the page inside the aggregate (see [`crate::url::page_key`])
    /// * `record` - The extracted content
    fn persist(&self, site_key: &str, page_key: &str, record: &ContentRecord)
        -> StoreResult<()>;

    /// Loads the aggregate of `site_key`
    ///
    /// A site that was never written yields an empty aggregate.
    fn load(&self, site_key: &str) -> StoreResult<SiteAggregate>;
}
