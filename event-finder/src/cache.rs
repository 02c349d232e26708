//! In-memory cache of completed exports.
//!
//! A search streams its progress and finishes before the user clicks the
//! download link, so finished exports are held here for a while. Entries
//! expire by TTL and capacity; nothing is written to disk.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Postcode, SearchRadius};
use crate::export::CsvExport;

/// Cache key for exports: (postcode, radius).
pub type ExportKey = (Postcode, SearchRadius);

/// Configuration for the export cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a finished export stays downloadable.
    pub ttl: Duration,

    /// Maximum number of cached exports.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_capacity: 100,
        }
    }
}

/// Finished exports, keyed by search.
///
/// A repeated search for the same postcode and radius replaces the entry.
#[derive(Clone)]
pub struct ExportCache {
    exports: MokaCache<ExportKey, Arc<CsvExport>>,
}

impl ExportCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let exports = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { exports }
    }

    /// Get a cached export.
    pub async fn get(&self, key: &ExportKey) -> Option<Arc<CsvExport>> {
        self.exports.get(key).await
    }

    /// Insert an export into the cache.
    pub async fn insert(&self, key: ExportKey, export: Arc<CsvExport>) {
        self.exports.insert(key, export).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.exports.entry_count()
    }
}
