//! Core `HttpCache` structure and initialization
//!
//! The orchestrator owns no storage logic of its own. Every collaborator
//! is a trait object injected at construction, so storage, key generation,
//! body capture and scheduling can each be substituted independently.

use std::sync::Arc;

use http::{HeaderMap, Method, StatusCode};

use crate::body::{BodyReader, SizeLimitedBodyReader};
use crate::cache::caching_policy::ResponseCachingPolicy;
use crate::cache::cache_key::{DefaultKeyGenerator, KeyGenerator};
use crate::cache::entry_updater::{DefaultEntryUpdater, EntryUpdater};
use crate::cache::invalidator::{DefaultInvalidator, Invalidator};
use crate::cache::memory_storage::MemoryStorage;
use crate::cache::response_generator::ResponseGenerator;
use crate::cache::storage::CacheStorage;
use crate::cache::validity::ValidityPolicy;
use crate::config::{CacheConfig, Validator};
use crate::error::Result;
use crate::scheduler::{PooledScheduler, Scheduler};
use crate::telemetry::CacheStats;

/// Collaborators an `HttpCache` is assembled from
#[derive(Clone)]
pub struct CacheParts {
    pub storage: Arc<dyn CacheStorage>,
    pub keys: Arc<dyn KeyGenerator>,
    pub updater: Arc<dyn EntryUpdater>,
    pub invalidator: Arc<dyn Invalidator>,
    pub body_reader: Arc<dyn BodyReader>,
    /// `None` disables background revalidation
    pub scheduler: Option<Arc<dyn Scheduler>>,
}

impl CacheParts {
    /// In-memory storage, default key generation and a worker pool sized by `config`
    ///
    /// # Errors
    ///
    /// Returns a scheduler error if the revalidation workers cannot be started.
    pub fn defaults(config: &CacheConfig) -> Result<Self> {
        let storage: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new(config.max_entries));
        Self::with_storage(config, storage)
    }

    /// Defaults around a caller-supplied storage backend
    ///
    /// # Errors
    ///
    /// Returns a scheduler error if the revalidation workers cannot be started.
    pub fn with_storage(config: &CacheConfig, storage: Arc<dyn CacheStorage>) -> Result<Self> {
        let keys: Arc<dyn KeyGenerator> = Arc::new(DefaultKeyGenerator::new());
        let scheduler: Option<Arc<dyn Scheduler>> = if config.revalidation_workers > 0 {
            Some(Arc::new(PooledScheduler::from_config(config)?))
        } else {
            None
        };

        Ok(Self {
            invalidator: Arc::new(DefaultInvalidator::new(storage.clone(), keys.clone())),
            storage,
            keys,
            updater: Arc::new(DefaultEntryUpdater::new()),
            body_reader: Arc::new(SizeLimitedBodyReader::default()),
            scheduler,
        })
    }
}

impl std::fmt::Debug for CacheParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheParts")
            .field("scheduler", &self.scheduler.is_some())
            .finish_non_exhaustive()
    }
}

/// HTTP response caching engine
pub struct HttpCache {
    pub(super) storage: Arc<dyn CacheStorage>,
    pub(super) keys: Arc<dyn KeyGenerator>,
    pub(super) updater: Arc<dyn EntryUpdater>,
    pub(super) invalidator: Arc<dyn Invalidator>,
    pub(super) body_reader: Arc<dyn BodyReader>,
    pub(super) scheduler: Option<Arc<dyn Scheduler>>,
    pub(super) generator: ResponseGenerator,
    pub(super) policy: ResponseCachingPolicy,
    pub(super) config: CacheConfig,
    pub(super) stats: CacheStats,
}

impl HttpCache {
    /// Create a cache with default collaborators
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate, or a
    /// scheduler error if the revalidation pool cannot start.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let parts = CacheParts::defaults(&config)?;
        Ok(Self::from_parts(config, parts))
    }

    /// Create a cache from explicit collaborators
    pub fn from_parts(config: CacheConfig, parts: CacheParts) -> Self {
        Self {
            storage: parts.storage,
            keys: parts.keys,
            updater: parts.updater,
            invalidator: parts.invalidator,
            body_reader: parts.body_reader,
            scheduler: parts.scheduler,
            generator: ResponseGenerator::new(ValidityPolicy::new(&config)),
            policy: ResponseCachingPolicy::new(&config),
            config,
            stats: CacheStats::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub fn key_generator(&self) -> &Arc<dyn KeyGenerator> {
        &self.keys
    }

    /// Renders entries into responses
    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    pub fn validity(&self) -> &ValidityPolicy {
        self.generator.validity()
    }

    /// True when background revalidation is available
    pub fn can_revalidate_in_background(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Whether a response may be stored, see [`ResponseCachingPolicy`]
    pub fn is_response_cacheable(&self, method: &Method, status: StatusCode, headers: &HeaderMap) -> bool {
        self.policy.is_response_cacheable(method, status, headers)
    }
}

impl std::fmt::Debug for HttpCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCache")
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
