//! Caller-owned cache of loaded datasets.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::{load_dataset, InventoryTable, LoadError};

/// A table handed out by [`DatasetCache`], with whether it was served from memory.
#[derive(Debug, Clone)]
pub struct CachedTable {
    pub table: Arc<InventoryTable>,
    pub cache_hit: bool,
}

/// Load-once cache keyed by dataset path.
///
/// Entries live until [`DatasetCache::invalidate`] or
/// [`DatasetCache::invalidate_all`] is called. Cached tables are immutable,
/// so readers never need to coordinate beyond the map lock.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<PathBuf, Arc<InventoryTable>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use.
    ///
    /// A failed load is not cached; the next call retries the file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<CachedTable, LoadError> {
        let path = path.as_ref();
        if let Some(table) = self.get(path) {
            debug!(path = %path.display(), "dataset cache hit");
            return Ok(CachedTable {
                table,
                cache_hit: true,
            });
        }

        debug!(path = %path.display(), "dataset cache miss");
        let loaded = Arc::new(load_dataset(path)?);

        // Two callers may race on a miss; the first insert wins so every
        // reader sees the same Arc afterwards.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let table = Arc::clone(entries.entry(path.to_path_buf()).or_insert(loaded));
        Ok(CachedTable {
            table,
            cache_hit: false,
        })
    }

    pub fn get(&self, path: &Path) -> Option<Arc<InventoryTable>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(path).map(Arc::clone)
    }

    /// Drop the entry for `path`. Returns whether an entry existed.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(path.as_ref()).is_some()
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str =
        "Date,Product_Name,Sales,Stock_Level,Supplier_Lead_Time,Price_Per_Unit,Weather_Index,Promotion\n";

    fn write_dataset(path: &Path, rows: &[&str]) {
        let mut content = String::from(HEADER);
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(path, content).expect("write dataset");
    }

    #[test]
    fn second_load_is_served_from_memory() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("sales.csv");
        write_dataset(&path, &["2024-01-01,Lamp,3,10,2,5.0,0.1,0"]);

        let cache = DatasetCache::new();
        let first = cache.load(&path).expect("first load");
        let second = cache.load(&path).expect("second load");

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert!(Arc::ptr_eq(&first.table, &second.table));
    }

    #[test]
    fn cached_table_ignores_file_changes_until_invalidated() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("sales.csv");
        write_dataset(&path, &["2024-01-01,Lamp,3,10,2,5.0,0.1,0"]);

        let cache = DatasetCache::new();
        assert_eq!(cache.load(&path).expect("load").table.len(), 1);

        write_dataset(
            &path,
            &[
                "2024-01-01,Lamp,3,10,2,5.0,0.1,0",
                "2024-01-02,Lamp,4,10,2,5.0,0.1,1",
            ],
        );
        assert_eq!(cache.load(&path).expect("cached").table.len(), 1);

        assert!(cache.invalidate(&path));
        let reloaded = cache.load(&path).expect("reload");
        assert!(!reloaded.cache_hit);
        assert_eq!(reloaded.table.len(), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("missing.csv");

        let cache = DatasetCache::new();
        assert!(cache.load(&path).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_all_clears_every_entry() {
        let temp = tempdir().expect("tempdir");
        let a = temp.path().join("a.csv");
        let b = temp.path().join("b.csv");
        write_dataset(&a, &["2024-01-01,Lamp,3,10,2,5.0,0.1,0"]);
        write_dataset(&b, &["2024-01-01,Desk,3,10,2,5.0,0.1,0"]);

        let cache = DatasetCache::new();
        cache.load(&a).expect("load a");
        cache.load(&b).expect("load b");
        assert_eq!(cache.len(), 2);

        cache.invalidate_all();
        assert!(cache.is_empty());
        assert!(!cache.invalidate(&a));
    }
}
