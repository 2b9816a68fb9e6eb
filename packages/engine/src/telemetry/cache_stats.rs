//! Cache statistics
//!
//! Provides `CacheStats` for tracking lookups, stores, merges and
//! invalidations with atomic counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Cache statistics for monitoring
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Lookups that found an entry
    pub hits: AtomicU64,
    /// Lookups that found nothing, including orphaned variant pointers
    pub misses: AtomicU64,
    /// Entries written by a full capture
    pub stores: AtomicU64,
    /// Entries replaced after revalidation
    pub updates: AtomicU64,
    /// Merges the storage could not apply and that were dropped
    pub update_failures: AtomicU64,
    /// Entries removed by invalidation
    pub invalidations: AtomicU64,
    /// Bodies passed through because they exceeded the size limit
    pub oversized: AtomicU64,
    /// Responses rejected as truncated
    pub incomplete: AtomicU64,
}

/// Point-in-time copy of `CacheStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub updates: u64,
    pub update_failures: u64,
    pub invalidations: u64,
    pub oversized: u64,
    pub incomplete: u64,
}

impl CacheStats {
    pub(crate) fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_many(counter: &AtomicU64, count: usize) {
        if count > 0 {
            counter.fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    /// Get hit rate as percentage
    pub fn hit_rate(&self) -> f64 {
        // Precision loss acceptable for cache hit rate statistics
        #[allow(clippy::cast_precision_loss)]
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        #[allow(clippy::cast_precision_loss)]
        let total = hits + self.misses.load(Ordering::Relaxed) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }

    /// Get statistics snapshot
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            update_failures: self.update_failures.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            oversized: self.oversized.load(Ordering::Relaxed),
            incomplete: self.incomplete.load(Ordering::Relaxed),
        }
    }
}
