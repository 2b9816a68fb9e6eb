//! Capacity enforcement
//!
//! Least recently used entries are evicted once the entry count exceeds
//! the configured maximum.

use std::sync::atomic::Ordering;

use super::core::MemoryStorage;

impl MemoryStorage {
    /// Evict least recently used entries until within capacity
    /// Returns the number of entries actually evicted
    pub fn evict_over_capacity(&self) -> usize {
        let excess = self.entries.len().saturating_sub(self.max_entries);
        if excess == 0 {
            return 0;
        }

        // Collect candidates (key, last_access); no shard guard is held afterwards
        let mut candidates: Vec<(String, u64)> = self
            .entries
            .iter()
            .map(|slot| (slot.key().clone(), slot.last_access.load(Ordering::Relaxed)))
            .collect();
        candidates.sort_by_key(|(_, last_access)| *last_access);

        let mut evicted = 0;
        for (key, _) in candidates.into_iter().take(excess) {
            if self.entries.remove(&key).is_some() {
                evicted += 1;
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        if evicted > 0 {
            tracing::debug!(
                target: "varcache::storage",
                evicted_count = evicted,
                max_entries = self.max_entries,
                "Storage evicted entries due to count limit"
            );
        }

        evicted
    }
}
