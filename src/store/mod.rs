//! Store module for persisting extracted content
//!
//! This module handles writing content records into per-site aggregates:
//! - One aggregate per site, keyed by page key
//! - Upsert semantics (a page stored twice keeps only its latest record)
//! - Durable, atomic replacement of the aggregate after every update

mod json;
mod traits;

pub use json::JsonStore;
pub use traits::{SiteAggregate, Store, StoreError, StoreResult};

use std::path::Path;

/// Opens the JSON store rooted at `destination`
///
/// # Arguments
///
/// * `destination` - Directory holding one `<site_key>.json` file per site
pub fn open_store(destination: &Path) -> JsonStore {
    JsonStore::new(destination)
}
