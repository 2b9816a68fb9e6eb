//! Write path: storing, variant registration and revalidation merges

use std::sync::Arc;
use std::time::SystemTime;

use http::{Request, Response};

use super::core::HttpCache;
use crate::cache::cache_entry::{CacheEntry, Variant};
use crate::error::Result;
use crate::http::HttpHost;
use crate::telemetry::CacheStats;

impl HttpCache {
    /// Store a complete entry for `request`
    ///
    /// A negotiated entry goes under its variant cache key and is then
    /// registered in the root's variant map.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails. A merge the backend
    /// abandons is logged and dropped instead.
    pub fn store_full_response(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        entry: Arc<CacheEntry>,
    ) -> Result<()> {
        if !entry.is_negotiated() && !entry.has_variants() {
            let key = self.keys.primary_key(host, request);
            self.storage.put(&key, entry)?;
            CacheStats::record(&self.stats.stores);
            tracing::debug!(target: "varcache::cache", key = %key, "stored entry");
            return Ok(());
        }

        let variant_key = self.keys.variant_key(request, &entry);
        let cache_key = self.keys.variant_cache_key(host, request, &entry);
        self.storage.put(&cache_key, entry.clone())?;
        CacheStats::record(&self.stats.stores);
        tracing::debug!(target: "varcache::cache", key = %cache_key, "stored variant");

        self.register_variant(host, request, &entry, &variant_key, &cache_key)
    }

    /// Point the root's variant map at a variant that is already stored
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub fn reuse_variant(&self, host: &HttpHost, request: &Request<()>, variant: &Variant) -> Result<()> {
        self.register_variant(
            host,
            request,
            variant.entry(),
            variant.variant_key(),
            variant.cache_key(),
        )
    }

    /// Combine a stale entry with the head of its revalidation response
    ///
    /// # Errors
    ///
    /// Returns whatever the configured `EntryUpdater` rejects.
    pub fn merge_revalidated_entry(
        &self,
        stale: &CacheEntry,
        response: &Response<()>,
        sent_at: SystemTime,
        received_at: SystemTime,
    ) -> Result<CacheEntry> {
        self.updater.merge(stale, sent_at, received_at, response)
    }

    /// Merge a revalidation into `stale` and store the result through the root path
    ///
    /// # Errors
    ///
    /// Returns an updater or storage error.
    pub fn update_entry(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        stale: &CacheEntry,
        response: &Response<()>,
        sent_at: SystemTime,
        received_at: SystemTime,
    ) -> Result<Arc<CacheEntry>> {
        let updated = Arc::new(self.merge_revalidated_entry(stale, response, sent_at, received_at)?);
        self.store_full_response(host, request, updated.clone())?;
        CacheStats::record(&self.stats.updates);
        Ok(updated)
    }

    /// Merge a revalidation into `stale` and store it directly under `cache_key`
    ///
    /// # Errors
    ///
    /// Returns an updater or storage error.
    pub fn update_variant_entry(
        &self,
        stale: &CacheEntry,
        response: &Response<()>,
        sent_at: SystemTime,
        received_at: SystemTime,
        cache_key: &str,
    ) -> Result<Arc<CacheEntry>> {
        let updated = Arc::new(self.merge_revalidated_entry(stale, response, sent_at, received_at)?);
        self.storage.put(cache_key, updated.clone())?;
        CacheStats::record(&self.stats.updates);
        tracing::debug!(target: "varcache::cache", key = cache_key, "updated variant");
        Ok(updated)
    }

    fn register_variant(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        entry: &CacheEntry,
        variant_key: &str,
        cache_key: &str,
    ) -> Result<()> {
        let primary = self.keys.primary_key(host, request);

        // Only an existing variant root knows the Vary fields lookups need
        let mut merge = |existing: Option<&CacheEntry>| match existing {
            Some(root) if root.has_variants() => root.with_variant(variant_key, cache_key),
            _ => entry.with_variant(variant_key, cache_key),
        };

        match self.storage.update(&primary, &mut merge) {
            Ok(()) => Ok(()),
            Err(err) if err.is_update_conflict() => {
                CacheStats::record(&self.stats.update_failures);
                tracing::warn!(
                    target: "varcache::cache",
                    key = %primary,
                    variant = variant_key,
                    error = %err,
                    "dropping variant registration"
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
