//! `CacheStorage` operations for `MemoryStorage`

use std::sync::Arc;
use std::sync::atomic::Ordering;

use dashmap::mapref::entry::Entry;

use super::core::{MemoryStorage, Slot};
use crate::cache::cache_entry::CacheEntry;
use crate::cache::storage::{CacheStorage, MergeFn};
use crate::error::Result;

impl CacheStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry>>> {
        let tick = self.tick();
        Ok(self.entries.get(key).map(|slot| {
            slot.last_access.store(tick, Ordering::Relaxed);
            Arc::clone(&slot.entry)
        }))
    }

    fn put(&self, key: &str, entry: Arc<CacheEntry>) -> Result<()> {
        let tick = self.tick();
        self.entries.insert(key.to_string(), Slot::new(entry, tick));
        self.evict_over_capacity();
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, merge: &mut MergeFn<'_>) -> Result<()> {
        let tick = self.tick();

        // The shard write lock is held for the whole read-merge-write
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let merged = merge(Some(occupied.get().entry.as_ref()));
                occupied.insert(Slot::new(Arc::new(merged), tick));
            }
            Entry::Vacant(vacant) => {
                let merged = merge(None);
                vacant.insert(Slot::new(Arc::new(merged), tick));
            }
        }

        self.evict_over_capacity();
        Ok(())
    }
}
