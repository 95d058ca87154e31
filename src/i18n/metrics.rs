//! Locale store metrics.
//!
//! Counts loads, saves, version bumps and lookup misses. Counters are
//! observability only and never influence behavior.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Load/save and lookup counters.
#[derive(Debug, Default)]
pub struct LocaleMetrics {
    /// Number of locales whose metadata and collections were loaded
    locales_loaded: AtomicUsize,

    /// Number of locales whose metadata was written
    locales_saved: AtomicUsize,

    /// Number of collection files read
    collections_loaded: AtomicUsize,

    /// Number of collection files written
    collections_saved: AtomicUsize,

    /// Number of translations whose version was incremented on save
    versions_bumped: AtomicUsize,

    /// Number of `get_string` calls for an unknown collection or key
    lookup_misses: AtomicUsize,
}

/// Global metrics instance (initialized lazily)
static METRICS: OnceLock<LocaleMetrics> = OnceLock::new();

impl LocaleMetrics {
    /// Create a standalone set of counters, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide metrics instance used by the library.
    pub fn global() -> &'static LocaleMetrics {
        METRICS.get_or_init(LocaleMetrics::new)
    }

    pub fn record_locale_loaded(&self) {
        self.locales_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_locale_saved(&self) {
        self.locales_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_collection_loaded(&self) {
        self.collections_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_collection_saved(&self) {
        self.collections_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_versions_bumped(&self, count: usize) {
        self.versions_bumped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_lookup_miss(&self) {
        self.lookup_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn locales_loaded(&self) -> usize {
        self.locales_loaded.load(Ordering::Relaxed)
    }

    pub fn locales_saved(&self) -> usize {
        self.locales_saved.load(Ordering::Relaxed)
    }

    pub fn collections_loaded(&self) -> usize {
        self.collections_loaded.load(Ordering::Relaxed)
    }

    pub fn collections_saved(&self) -> usize {
        self.collections_saved.load(Ordering::Relaxed)
    }

    pub fn versions_bumped(&self) -> usize {
        self.versions_bumped.load(Ordering::Relaxed)
    }

    pub fn lookup_misses(&self) -> usize {
        self.lookup_misses.load(Ordering::Relaxed)
    }

    /// Snapshot the current counter values.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            locales_loaded: self.locales_loaded(),
            locales_saved: self.locales_saved(),
            collections_loaded: self.collections_loaded(),
            collections_saved: self.collections_saved(),
            versions_bumped: self.versions_bumped(),
            lookup_misses: self.lookup_misses(),
        }
    }
}

/// Point-in-time copy of [`LocaleMetrics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsReport {
    pub locales_loaded: usize,
    pub locales_saved: usize,
    pub collections_loaded: usize,
    pub collections_saved: usize,
    pub versions_bumped: usize,
    pub lookup_misses: usize,
}
