//! Cache configuration and preset policies
//!
//! Provides `CacheConfig` for configuring cache behavior including
//! object size limits, capacity, heuristic freshness and background
//! revalidation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::validation::{ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// Cache configuration and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Largest response body, in bytes, that will be captured into the cache
    pub max_object_size: u64,
    /// Maximum number of entries held by the in-memory storage
    pub max_entries: usize,
    /// Behave as a shared cache (honor `s-maxage`, refuse `private`)
    pub shared_cache: bool,
    /// Compute freshness heuristically when the origin gives no explicit lifetime
    pub heuristic_caching_enabled: bool,
    /// Fraction of `Date - Last-Modified` used as heuristic lifetime
    pub heuristic_coefficient: f32,
    /// Heuristic lifetime when no `Last-Modified` is available
    pub heuristic_default_lifetime: Duration,
    /// Worker threads for background revalidation, zero disables it
    pub revalidation_workers: usize,
    /// Pending background revalidations before new ones are rejected
    pub revalidation_queue_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_object_size: ConfigDefaults::DEFAULT_MAX_OBJECT_SIZE,
            max_entries: ConfigDefaults::DEFAULT_MAX_ENTRIES,
            shared_cache: true,
            heuristic_caching_enabled: false,
            heuristic_coefficient: ConfigDefaults::DEFAULT_HEURISTIC_COEFFICIENT,
            heuristic_default_lifetime: ConfigDefaults::DEFAULT_HEURISTIC_LIFETIME,
            revalidation_workers: ConfigDefaults::DEFAULT_REVALIDATION_WORKERS,
            revalidation_queue_size: ConfigDefaults::DEFAULT_REVALIDATION_QUEUE_SIZE,
        }
    }
}

impl CacheConfig {
    /// Create aggressive caching configuration
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            max_object_size: 10 * 1024 * 1024, // 10MB
            max_entries: 5000,
            shared_cache: false,
            heuristic_caching_enabled: true,
            heuristic_coefficient: 0.1,
            heuristic_default_lifetime: Duration::from_secs(300),
            revalidation_workers: 4,
            revalidation_queue_size: 500,
        }
    }

    /// Create conservative caching configuration
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            max_object_size: 64 * 1024, // 64KB
            max_entries: 200,
            shared_cache: true,
            heuristic_caching_enabled: false,
            heuristic_coefficient: ConfigDefaults::DEFAULT_HEURISTIC_COEFFICIENT,
            heuristic_default_lifetime: Duration::ZERO,
            revalidation_workers: 1,
            revalidation_queue_size: 50,
        }
    }

    /// Create no-cache configuration (disabled caching)
    #[must_use]
    pub fn no_cache() -> Self {
        Self {
            max_object_size: 0,
            max_entries: 0,
            shared_cache: true,
            heuristic_caching_enabled: false,
            heuristic_coefficient: 0.0,
            heuristic_default_lifetime: Duration::ZERO,
            revalidation_workers: 0,
            revalidation_queue_size: 0,
        }
    }

    /// True when this configuration stores nothing
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.max_entries == 0
    }

    /// Parse a configuration from a JSON document, filling omitted fields with defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::Malformed` for invalid JSON and any
    /// validation error for out-of-range values.
    pub fn from_json(document: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }
}

impl Validator for CacheConfig {
    fn validate(&self) -> ConfigResult<()> {
        // A disabled cache has nothing further to check
        if self.is_disabled() {
            return Ok(());
        }

        ConfigValidator::validate_size(
            self.max_object_size,
            ConfigDefaults::MAX_OBJECT_SIZE_LIMIT,
            "max_object_size",
        )?;
        ConfigValidator::validate_range(self.heuristic_coefficient, 0.0, 1.0, "heuristic_coefficient")?;
        ConfigValidator::validate_lifetime(
            self.heuristic_default_lifetime,
            "heuristic_default_lifetime",
        )?;

        if self.revalidation_workers > 0 && self.revalidation_queue_size == 0 {
            return Err(ConfigurationError::Conflict(
                "revalidation_workers requires a non-zero revalidation_queue_size".to_string(),
            ));
        }

        Ok(())
    }
}
