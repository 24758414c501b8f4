//! Per-site summary of a destination directory
//!
//! Reads every aggregate under a store's destination and reports how many
//! pages each site holds.

use crate::store::{JsonStore, Store, StoreResult};

/// Page count of a single site aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub site_key: String,
    pub pages: usize,
    pub page_keys: Vec<String>,
}

/// Loads a summary of every site under the store's destination
///
/// # Arguments
///
/// * `store` - The JSON store to read
///
/// # Returns
///
/// * `Ok(Vec<SiteSummary>)` - One entry per site, sorted by site key
/// * `Err(StoreError)` - The destination or an aggregate could not be read
pub fn load_site_summaries(store: &JsonStore) -> StoreResult<Vec<SiteSummary>> {
    let mut summaries = Vec::new();
    for site_key in store.list_sites()? {
        let aggregate = store.load(&site_key)?;
        summaries.push(SiteSummary {
            pages: aggregate.len(),
            page_keys: aggregate.into_keys().collect(),
            site_key,
        });
    }
    Ok(summaries)
}

/// Prints site summaries to stdout
pub fn print_site_summaries(summaries: &[SiteSummary]) {
    println!("=== Stored Sites ===\n");

    if summaries.is_empty() {
        println!("  (none)");
        return;
    }

    let total: usize = summaries.iter().map(|s| s.pages).sum();
    for summary in summaries {
        println!("  {}: {} pages", summary.site_key, summary.pages);
        for key in &summary.page_keys {
            println!("    - {}", key);
        }
    }
    println!("\nTotal: {} pages across {} sites", total, summaries.len());
}
