//! Process-wide dataset cache.
//!
//! Every consumer goes through [`DatasetStore::get_or_load`], so a dataset is
//! parsed and cleaned once per path and shared from then on. The map lock is
//! held across the load itself, which is the single-initialization guarantee:
//! a second caller for the same path blocks until the first load finishes and
//! then gets the cached copy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::Result;
use log::debug;

use crate::dataset::{Dataset, LoadOptions};

#[derive(Debug, Default)]
pub struct DatasetStore {
    cache: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
    loads: AtomicUsize,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dataset for `path`, loading it on first request. The cache
    /// key is the canonicalized path so aliased spellings share one entry.
    pub fn get_or_load(&self, path: &Path, options: &LoadOptions) -> Result<Arc<Dataset>> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = cache.get(&key) {
            debug!("Dataset cache hit for {key:?}");
            return Ok(Arc::clone(dataset));
        }
        let dataset = Arc::new(Dataset::load(&key, options)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        cache.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Number of real loads performed, i.e. cache misses. Lets callers and
    /// tests confirm memoization instead of assuming it.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

/// The store shared by every command in the process.
pub fn shared() -> &'static DatasetStore {
    static STORE: OnceLock<DatasetStore> = OnceLock::new();
    STORE.get_or_init(DatasetStore::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn repeated_requests_load_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        fs::write(&path, "Region,Sales\nEast,100\nWest,200\n").unwrap();

        let store = DatasetStore::new();
        let first = store.get_or_load(&path, &LoadOptions::default()).unwrap();
        let second = store.get_or_load(&path, &LoadOptions::default()).unwrap();

        assert_eq!(store.load_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.row_count(), 2);
    }

    #[test]
    fn distinct_paths_load_separately() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "Sales\n1\n").unwrap();
        fs::write(&b, "Sales\n2\n").unwrap();

        let store = DatasetStore::new();
        store.get_or_load(&a, &LoadOptions::default()).unwrap();
        store.get_or_load(&b, &LoadOptions::default()).unwrap();
        assert_eq!(store.load_count(), 2);
    }

    #[test]
    fn load_failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let store = DatasetStore::new();

        assert!(store.get_or_load(&path, &LoadOptions::default()).is_err());
        assert_eq!(store.load_count(), 0);

        fs::write(&path, "Sales\n1\n").unwrap();
        let dataset = store.get_or_load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(dataset.row_count(), 1);
        assert_eq!(store.load_count(), 1);
    }
}
