//! Time-expiring dataset cache with an on-disk snapshot per key.
//!
//! One `DatasetCache` is built per process and shared by reference (or
//! through an `Arc` in the HTTP server). Every `set` is mirrored to
//! `<dir>/<key>.json`, and construction seeds the cache from the snapshots
//! found there, so consecutive CLI runs share a download.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::SourceError;
use crate::school::School;
use crate::utils::plural::plural_count;

/// Key of the full school list.
pub const DEFAULT_KEY: &str = "all_schools";

/// One hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct Entry {
    data: Arc<Vec<School>>,
    stored_at: SystemTime,
}

impl Entry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        // A stamp in the future (clock skew) counts as fresh.
        SystemTime::now()
            .duration_since(self.stored_at)
            .map_or(true, |age| age < ttl)
    }
}

/// On-disk form of one cache entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix seconds.
    pub fetched_at: u64,
    pub schools: Vec<School>,
}

pub struct DatasetCache {
    entries: RwLock<FxHashMap<String, Entry>>,
    /// Snapshot directory; `None` keeps everything in memory.
    dir: Option<PathBuf>,
    /// Serializes refreshes so concurrent misses download once.
    refresh: Mutex<()>,
}

impl DatasetCache {
    /// Memory-only cache.
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            dir: None,
            refresh: Mutex::new(()),
        }
    }

    /// Cache mirrored to `dir`, seeded from the snapshots already there.
    ///
    /// Unreadable or corrupt snapshots are skipped.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let mut entries = FxHashMap::default();

        if let Ok(read_dir) = fs::read_dir(&dir) {
            for path in read_dir.flatten().map(|e| e.path()) {
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                match read_snapshot(&path) {
                    Ok(snapshot) => {
                        crate::debug!("cache"; "seeded `{}` with {}", key, plural_count(snapshot.schools.len(), "school"));
                        entries.insert(
                            key.to_string(),
                            Entry {
                                data: Arc::new(snapshot.schools),
                                stored_at: UNIX_EPOCH + Duration::from_secs(snapshot.fetched_at),
                            },
                        );
                    }
                    Err(e) => crate::debug!("cache"; "ignoring {}", e),
                }
            }
        }

        Self {
            entries: RwLock::new(entries),
            dir: Some(dir),
            refresh: Mutex::new(()),
        }
    }

    /// Cached data for `key` if it was stored less than `ttl` ago.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Arc<Vec<School>>> {
        self.entries
            .read()
            .get(key)
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| Arc::clone(&entry.data))
    }

    /// When `key` was stored, fresh or not.
    #[cfg(test)]
    pub fn stored_at(&self, key: &str) -> Option<SystemTime> {
        self.entries.read().get(key).map(|entry| entry.stored_at)
    }

    /// Store `data` under `key`, stamped now, and mirror it to disk.
    ///
    /// A failed snapshot write is logged; the in-memory entry is kept.
    pub fn set(&self, key: &str, data: Vec<School>) -> Arc<Vec<School>> {
        self.set_at(key, data, SystemTime::now())
    }

    fn set_at(&self, key: &str, data: Vec<School>, stored_at: SystemTime) -> Arc<Vec<School>> {
        let data = Arc::new(data);

        if let Some(path) = self.snapshot_path(key) {
            let fetched_at = stored_at
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs());
            match write_snapshot(&path, fetched_at, &data) {
                Ok(()) => crate::debug!("cache"; "wrote {}", path.display()),
                Err(e) => crate::log!("cache"; "failed to write snapshot: {}", e),
            }
        }

        self.entries.write().insert(
            key.to_string(),
            Entry {
                data: Arc::clone(&data),
                stored_at,
            },
        );
        data
    }

    /// Drop every entry and its snapshot.
    pub fn clear(&self) -> Result<(), SourceError> {
        let keys: Vec<String> = self.entries.write().drain().map(|(key, _)| key).collect();
        for key in keys {
            if let Some(path) = self.snapshot_path(&key)
                && path.exists()
            {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn snapshot_path(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{key}.json")))
    }
}

/// Return the cached school list, or fetch, store and return a fresh one.
///
/// `force` skips the lookup. Concurrent callers that miss together share a
/// single fetch.
pub fn load_or_fetch<F>(
    cache: &DatasetCache,
    ttl: Duration,
    force: bool,
    fetch: F,
) -> Result<Arc<Vec<School>>, SourceError>
where
    F: FnOnce() -> Result<Vec<School>, SourceError>,
{
    if !force && let Some(data) = cache.get(DEFAULT_KEY, ttl) {
        crate::debug!("cache"; "hit `{}`", DEFAULT_KEY);
        return Ok(data);
    }

    let _guard = cache.refresh.lock();
    if !force && let Some(data) = cache.get(DEFAULT_KEY, ttl) {
        return Ok(data);
    }

    crate::debug!("cache"; "miss `{}`, fetching", DEFAULT_KEY);
    let schools = fetch()?;
    Ok(cache.set(DEFAULT_KEY, schools))
}

// ============================================================================
// snapshot files
// ============================================================================

fn read_snapshot(path: &Path) -> Result<Snapshot, SourceError> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| SourceError::Snapshot {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_snapshot(path: &Path, fetched_at: u64, schools: &[School]) -> Result<(), SourceError> {
    #[derive(Serialize)]
    struct SnapshotRef<'a> {
        fetched_at: u64,
        schools: &'a [School],
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(&SnapshotRef {
        fetched_at,
        schools,
    })
    .map_err(|e| SourceError::Snapshot {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Write then rename so a reader never sees half a file.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn schools(names: &[&str]) -> Vec<School> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| School {
                name: (*name).into(),
                code: i.to_string(),
                ..School::default()
            })
            .collect()
    }

    #[test]
    fn test_get_fresh_and_missing() {
        let cache = DatasetCache::in_memory();
        assert!(cache.get(DEFAULT_KEY, DEFAULT_TTL).is_none());

        cache.set(DEFAULT_KEY, schools(&["A", "B"]));
        let data = cache.get(DEFAULT_KEY, DEFAULT_TTL).unwrap();
        assert_eq!(data.len(), 2);
        assert!(cache.get("other", DEFAULT_TTL).is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = DatasetCache::in_memory();
        let two_hours_ago = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
        cache.set_at(DEFAULT_KEY, schools(&["A"]), two_hours_ago);

        assert!(cache.get(DEFAULT_KEY, DEFAULT_TTL).is_none());
        assert!(cache.get(DEFAULT_KEY, Duration::from_secs(3 * 60 * 60)).is_some());
        assert_eq!(cache.stored_at(DEFAULT_KEY), Some(two_hours_ago));
    }

    #[test]
    fn test_clear() {
        let dir = TempDir::new().unwrap();
        let cache = DatasetCache::open(dir.path());
        cache.set(DEFAULT_KEY, schools(&["A"]));
        assert!(dir.path().join("all_schools.json").exists());

        cache.clear().unwrap();
        assert!(cache.get(DEFAULT_KEY, DEFAULT_TTL).is_none());
        assert!(!dir.path().join("all_schools.json").exists());
    }

    #[test]
    fn test_snapshot_seeds_new_cache() {
        let dir = TempDir::new().unwrap();
        DatasetCache::open(dir.path()).set(DEFAULT_KEY, schools(&["A", "B", "C"]));

        let reopened = DatasetCache::open(dir.path());
        let data = reopened.get(DEFAULT_KEY, DEFAULT_TTL).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[2].name, "C");
    }

    #[test]
    fn test_snapshot_keeps_fetch_time() {
        let dir = TempDir::new().unwrap();
        let stale = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
        DatasetCache::open(dir.path()).set_at(DEFAULT_KEY, schools(&["A"]), stale);

        let reopened = DatasetCache::open(dir.path());
        assert!(reopened.get(DEFAULT_KEY, DEFAULT_TTL).is_none());
        assert!(reopened.stored_at(DEFAULT_KEY).is_some());
    }

    #[test]
    fn test_corrupt_snapshot_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("all_schools.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let cache = DatasetCache::open(dir.path());
        assert!(cache.get(DEFAULT_KEY, DEFAULT_TTL).is_none());
    }

    #[test]
    fn test_missing_dir_is_created_on_set() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = DatasetCache::open(&nested);
        cache.set(DEFAULT_KEY, schools(&["A"]));
        assert!(nested.join("all_schools.json").exists());
    }

    #[test]
    fn test_load_or_fetch_uses_cache() {
        let cache = DatasetCache::in_memory();
        let calls = Cell::new(0);
        let fetch = || {
            calls.set(calls.get() + 1);
            Ok(schools(&["A"]))
        };

        let first = load_or_fetch(&cache, DEFAULT_TTL, false, fetch).unwrap();
        let second = load_or_fetch(&cache, DEFAULT_TTL, false, fetch).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));

        load_or_fetch(&cache, DEFAULT_TTL, true, fetch).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_load_or_fetch_error_leaves_cache_empty() {
        let cache = DatasetCache::in_memory();
        let result = load_or_fetch(&cache, DEFAULT_TTL, false, || {
            Err(SourceError::Status {
                url: "u".into(),
                code: 503,
            })
        });
        assert!(matches!(result, Err(SourceError::Status { code: 503, .. })));
        assert!(cache.get(DEFAULT_KEY, DEFAULT_TTL).is_none());
    }
}
