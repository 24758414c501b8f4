//! JSON file store
//!
//! One file per site, `<site_key>.json`, under a destination directory. The
//! file holds an object keyed by page key whose values are content records.

use crate::crawler::ContentRecord;
use crate::store::traits::{SiteAggregate, Store, StoreError, StoreResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Extension of aggregate files
const AGGREGATE_EXTENSION: &str = "json";

/// Extension of the scratch file an aggregate is written to before renaming
const SCRATCH_EXTENSION: &str = "json.tmp";

/// Indentation used when writing aggregates
const INDENT: &[u8] = b"    ";

/// File-backed [`Store`] writing one JSON aggregate per site
///
/// Writes for the same site are serialized through a per-site lock, and every
/// write replaces the aggregate file atomically (scratch file + rename).
#[derive(Debug)]
pub struct JsonStore {
    destination: PathBuf,
    site_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl JsonStore {
    /// Creates a store rooted at `destination`
    ///
    /// The directory is created lazily, on the first write.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            site_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the path of the aggregate file for `site_key`
    pub fn site_path(&self, site_key: &str) -> PathBuf {
        self.destination
            .join(format!("{}.{}", site_key, AGGREGATE_EXTENSION))
    }

    /// Lists the site keys that have an aggregate under the destination
    ///
    /// A destination that does not exist yet has no sites.
    pub fn list_sites(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.destination) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.destination.clone(),
                    source,
                })
            }
        };

        let mut sites = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.destination.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(AGGREGATE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sites.push(stem.to_string());
            }
        }

        sites.sort();
        Ok(sites)
    }

    /// Returns the lock guarding the aggregate of `site_key`
    fn site_lock(&self, site_key: &str) -> StoreResult<Arc<Mutex<()>>> {
        let mut locks = self
            .site_locks
            .lock()
            .map_err(|_| StoreError::LockPoisoned(site_key.to_string()))?;

        Ok(locks
            .entry(site_key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    fn ensure_destination(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.destination).map_err(|source| StoreError::Io {
            path: self.destination.clone(),
            source,
        })
    }
}

impl Store for JsonStore {
    fn persist(
        &self,
        site_key: &str,
        page_key: &str,
        record: &ContentRecord,
    ) -> StoreResult<()> {
        let lock = self.site_lock(site_key)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned(site_key.to_string()))?;

        self.ensure_destination()?;

        let path = self.site_path(site_key);
        let mut aggregate = read_aggregate(&path)?;
        let replaced = aggregate
            .insert(page_key.to_string(), record.clone())
            .is_some();
        write_aggregate(&path, &aggregate)?;

        tracing::debug!(
            "Persisted {}/{} ({} pages, replaced: {})",
            site_key,
            page_key,
            aggregate.len(),
            replaced
        );

        Ok(())
    }

    fn load(&self, site_key: &str) -> StoreResult<SiteAggregate> {
        let lock = self.site_lock(site_key)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned(site_key.to_string()))?;

        read_aggregate(&self.site_path(site_key))
    }
}

/// Reads an aggregate file; a missing file is an empty aggregate
fn read_aggregate(path: &Path) -> StoreResult<SiteAggregate> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SiteAggregate::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes an aggregate to a scratch file, flushes it, and renames it into place
fn write_aggregate(path: &Path, aggregate: &SiteAggregate) -> StoreResult<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    aggregate.serialize(&mut serializer)?;

    let scratch = path.with_extension(SCRATCH_EXTENSION);
    let io_err = |source| StoreError::Io {
        path: scratch.clone(),
        source,
    };

    let mut file = File::create(&scratch).map_err(io_err)?;
    file.write_all(&buf).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    fs::rename(&scratch, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
