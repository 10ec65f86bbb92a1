//! `[cache]` section configuration.
//!
//! ```toml
//! [cache]
//! enable = true
//! dir = ".schoolfinder/cache"   # Relative to the config file
//! ttl_secs = 3600
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::source::{DEFAULT_TTL, DatasetCache};

/// Default cache directory, relative to the project root.
pub const CACHE_DIR: &str = ".schoolfinder/cache";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Mirror the dataset to disk between runs.
    pub enable: bool,

    /// Snapshot directory.
    pub dir: PathBuf,

    /// Seconds a download stays fresh.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enable: true,
            dir: PathBuf::from(CACHE_DIR),
            ttl_secs: DEFAULT_TTL.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Disk-backed when enabled, memory-only otherwise.
    pub fn open(&self) -> DatasetCache {
        if self.enable {
            DatasetCache::open(&self.dir)
        } else {
            DatasetCache::in_memory()
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.enable && self.ttl_secs == 0 {
            diag.error_with_hint(
                FieldPath::new("cache.ttl_secs"),
                "must be greater than 0",
                "set `enable = false` to turn the cache off",
            );
        }
    }
}
