//! Invalidation entry points

use http::{Request, Response};

use super::core::HttpCache;
use crate::error::Result;
use crate::http::{HttpHost, is_safe_method};
use crate::telemetry::CacheStats;

impl HttpCache {
    /// Remove the primary entry when `request` uses an unsafe method
    ///
    /// Variants are left to eviction; the root that pointed at them is gone.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub fn invalidate_for_unsafe_request(&self, host: &HttpHost, request: &Request<()>) -> Result<()> {
        if is_safe_method(request.method()) {
            return Ok(());
        }

        let key = self.keys.primary_key(host, request);
        if self.storage.get(&key)?.is_none() {
            return Ok(());
        }
        self.storage.remove(&key)?;
        CacheStats::record(&self.stats.invalidations);
        tracing::debug!(target: "varcache::cache", key = %key, method = %request.method(), "invalidated");
        Ok(())
    }

    /// Run the configured `Invalidator` for `request`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub fn invalidate_related(&self, host: &HttpHost, request: &Request<()>) -> Result<()> {
        let removed = self.invalidator.invalidate(host, request)?;
        CacheStats::record_many(&self.stats.invalidations, removed);
        Ok(())
    }

    /// Run the configured `Invalidator` for `request` and the origin's `response`
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend fails.
    pub fn invalidate_related_for_response(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        response: &Response<()>,
    ) -> Result<()> {
        let removed = self.invalidator.invalidate_for_response(host, request, response)?;
        CacheStats::record_many(&self.stats.invalidations, removed);
        Ok(())
    }
}
