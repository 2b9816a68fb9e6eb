//! Size limits, cache role and freshness settings

use std::time::Duration;

use varcache_engine::config::CacheConfig;

use crate::builder::core::CacheBuilder;

impl CacheBuilder {
    /// Largest body, in bytes, captured into the cache
    ///
    /// Larger bodies are passed through to the client uncached.
    #[must_use]
    pub fn max_object_size(mut self, bytes: u64) -> Self {
        self.config.max_object_size = bytes;
        self
    }

    /// Capacity of the in-memory storage
    #[must_use]
    pub fn max_entries(mut self, entries: usize) -> Self {
        self.config.max_entries = entries;
        self
    }

    /// Behave as a shared cache, honoring `s-maxage` and refusing `private`
    #[must_use]
    pub fn shared(mut self) -> Self {
        self.config.shared_cache = true;
        self
    }

    /// Behave as a private, single-user cache
    #[must_use]
    pub fn private(mut self) -> Self {
        self.config.shared_cache = false;
        self
    }

    /// Derive freshness from `Last-Modified` when the origin gives no lifetime
    ///
    /// `coefficient` is the fraction of `Date - Last-Modified` used, and
    /// `default_lifetime` applies when there is no `Last-Modified`.
    #[must_use]
    pub fn heuristic(mut self, coefficient: f32, default_lifetime: Duration) -> Self {
        self.config.heuristic_caching_enabled = true;
        self.config.heuristic_coefficient = coefficient;
        self.config.heuristic_default_lifetime = default_lifetime;
        self
    }

    #[must_use]
    pub fn no_heuristic(mut self) -> Self {
        self.config.heuristic_caching_enabled = false;
        self
    }

    /// Replace the whole configuration
    #[must_use]
    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Large objects and heuristic freshness
    #[must_use]
    pub fn aggressive(self) -> Self {
        self.with_config(CacheConfig::aggressive())
    }

    /// Small objects, explicit freshness only
    #[must_use]
    pub fn conservative(self) -> Self {
        self.with_config(CacheConfig::conservative())
    }
}
