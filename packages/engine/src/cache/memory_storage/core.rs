//! Core `MemoryStorage` structure and initialization

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::super::cache_entry::CacheEntry;

/// Stored entry plus its last-access tick for LRU ordering
#[derive(Debug)]
pub(super) struct Slot {
    pub(super) entry: Arc<CacheEntry>,
    pub(super) last_access: AtomicU64,
}

impl Slot {
    pub(super) fn new(entry: Arc<CacheEntry>, tick: u64) -> Self {
        Self {
            entry,
            last_access: AtomicU64::new(tick),
        }
    }
}

/// Bounded in-memory storage with LRU eviction
#[derive(Debug)]
pub struct MemoryStorage {
    /// Main storage (key -> slot)
    pub(super) entries: DashMap<String, Slot>,
    /// Maximum number of entries before eviction kicks in
    pub(super) max_entries: usize,
    /// Logical clock ordering accesses
    pub(super) clock: AtomicU64,
    /// Entries removed to stay within capacity
    pub(super) evictions: AtomicU64,
}

impl MemoryStorage {
    /// Create storage holding at most `max_entries` entries
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
            clock: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Number of stored entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entries evicted so far
    #[must_use]
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Stored keys, in no particular order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|slot| slot.key().clone()).collect()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub(super) fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(crate::config::ConfigDefaults::DEFAULT_MAX_ENTRIES)
    }
}
