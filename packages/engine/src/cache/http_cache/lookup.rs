//! Read path

use std::collections::HashMap;
use std::sync::Arc;

use http::Request;

use super::core::HttpCache;
use crate::cache::cache_entry::{CacheEntry, Variant};
use crate::error::Result;
use crate::http::HttpHost;
use crate::telemetry::CacheStats;

impl HttpCache {
    /// Find the entry that answers `request`
    ///
    /// A negotiated resource resolves through its root's variant map. A
    /// variant the root does not know, or one whose entry has gone, is a miss.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub fn lookup(&self, host: &HttpHost, request: &Request<()>) -> Result<Option<Arc<CacheEntry>>> {
        let primary = self.keys.primary_key(host, request);
        let Some(root) = self.storage.get(&primary)? else {
            return Ok(self.miss(&primary, "absent"));
        };

        if !root.has_variants() {
            return Ok(self.hit(&primary, root));
        }

        let variant_key = self.keys.variant_key(request, &root);
        let Some(cache_key) = root.variant_map().get(&variant_key) else {
            return Ok(self.miss(&primary, "unknown variant"));
        };

        match self.storage.get(cache_key)? {
            Some(variant) => Ok(self.hit(cache_key, variant)),
            None => Ok(self.miss(cache_key, "orphaned variant")),
        }
    }

    /// Stored variants of the requested resource that carry a strong ETag, keyed by that ETag
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub fn variants_with_validators(
        &self,
        host: &HttpHost,
        request: &Request<()>,
    ) -> Result<HashMap<String, Variant>> {
        let mut variants = HashMap::new();

        let primary = self.keys.primary_key(host, request);
        let Some(root) = self.storage.get(&primary)? else {
            return Ok(variants);
        };

        for (variant_key, cache_key) in root.variant_map() {
            let Some(entry) = self.storage.get(cache_key)? else {
                continue;
            };
            let Some(etag) = entry.etag().filter(|etag| !etag.starts_with("W/")) else {
                continue;
            };
            let etag = etag.to_string();
            variants.insert(etag, Variant::new(variant_key.clone(), cache_key.clone(), entry));
        }

        Ok(variants)
    }

    fn hit(&self, key: &str, entry: Arc<CacheEntry>) -> Option<Arc<CacheEntry>> {
        CacheStats::record(&self.stats.hits);
        tracing::debug!(target: "varcache::cache", key, "cache hit");
        Some(entry)
    }

    fn miss(&self, key: &str, reason: &'static str) -> Option<Arc<CacheEntry>> {
        CacheStats::record(&self.stats.misses);
        tracing::debug!(target: "varcache::cache", key, reason, "cache miss");
        None
    }
}
