//! Cache storage contract
//!
//! Storage maps keys to shared, immutable entries. Backends decide
//! capacity and eviction. The one compound operation is `update`, which
//! must read, merge and write a key as a single indivisible step.

use std::sync::Arc;

use super::cache_entry::CacheEntry;
use crate::error::Result;

/// Merge callback handed to `CacheStorage::update`
///
/// Receives the current entry (or `None`) and returns its replacement. It
/// may run more than once on backends that retry, and must not call back
/// into the storage it is merging into.
pub type MergeFn<'a> = dyn FnMut(Option<&CacheEntry>) -> CacheEntry + 'a;

/// Key -> entry store shared by all request-handling threads
pub trait CacheStorage: Send + Sync {
    /// Fetch the entry stored under `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry>>>;

    /// Store `entry` under `key`, replacing any previous entry
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written.
    fn put(&self, key: &str, entry: Arc<CacheEntry>) -> Result<()>;

    /// Remove whatever is stored under `key`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<()>;

    /// Atomically replace the entry under `key` with `merge(current)`
    ///
    /// # Errors
    ///
    /// Returns an update-conflict error if the backend gave up after its own
    /// retries, or a storage error on I/O failure. The previously stored
    /// entry is left intact in both cases.
    fn update(&self, key: &str, merge: &mut MergeFn<'_>) -> Result<()>;
}
