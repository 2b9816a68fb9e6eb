//! Core `CacheBuilder` structure and assembly
//!
//! Contains the builder struct, the scheduler selection and the `build`
//! methods that validate the configuration and wire the engine's
//! collaborators together.

use std::fmt;
use std::sync::Arc;

use varcache_engine::body::{BodyReader, SizeLimitedBodyReader};
use varcache_engine::cache::{CacheParts, CacheStorage, HttpCache};
use varcache_engine::config::{CacheConfig, Validator};
use varcache_engine::error::Result;
use varcache_engine::resource::ResourceFactory;
use varcache_engine::scheduler::Scheduler;

/// How background revalidation is scheduled
#[derive(Clone, Default)]
pub enum SchedulerChoice {
    /// Worker pool sized by `revalidation_workers`, disabled when that is zero
    #[default]
    Configured,
    /// Caller-supplied scheduler
    Custom(Arc<dyn Scheduler>),
    /// No background revalidation
    Disabled,
}

impl fmt::Debug for SchedulerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerChoice::Configured => f.write_str("Configured"),
            SchedulerChoice::Custom(_) => f.write_str("Custom"),
            SchedulerChoice::Disabled => f.write_str("Disabled"),
        }
    }
}

/// Fluent builder for `HttpCache`
///
/// Every setter consumes and returns the builder. Nothing is validated or
/// started until [`CacheBuilder::build`].
#[derive(Clone, Default)]
pub struct CacheBuilder {
    /// Engine configuration being built
    pub(crate) config: CacheConfig,
    /// Storage backend, in-memory when unset
    pub(crate) storage: Option<Arc<dyn CacheStorage>>,
    /// Where captured bodies are kept, heap when unset
    pub(crate) resource_factory: Option<Arc<dyn ResourceFactory>>,
    /// Replaces the size-limited reader entirely when set
    pub(crate) body_reader: Option<Arc<dyn BodyReader>>,
    pub(crate) scheduler: SchedulerChoice,
}

impl CacheBuilder {
    /// Start from the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    #[must_use]
    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Start from a JSON configuration document
    ///
    /// Omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for malformed JSON or out-of-range values.
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(Self::from_config(CacheConfig::from_json(document)?))
    }

    /// Start from an already parsed JSON value, such as a section of a larger document
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value does not describe a valid configuration.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let config: CacheConfig = serde_json::from_value(value)
            .map_err(varcache_engine::config::ConfigurationError::from)?;
        config.validate()?;
        Ok(Self::from_config(config))
    }

    /// Configuration as currently set
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Validate the configuration and assemble the cache
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration does not validate,
    /// or a scheduler error if the revalidation pool cannot start.
    pub fn build(self) -> Result<HttpCache> {
        self.config.validate()?;

        // The configured pool is only started when it will be used
        let pool_config = match self.scheduler {
            SchedulerChoice::Configured => self.config.clone(),
            SchedulerChoice::Custom(_) | SchedulerChoice::Disabled => CacheConfig {
                revalidation_workers: 0,
                ..self.config.clone()
            },
        };

        let mut parts = match self.storage {
            Some(storage) => CacheParts::with_storage(&pool_config, storage)?,
            None => CacheParts::defaults(&pool_config)?,
        };

        if let SchedulerChoice::Custom(scheduler) = self.scheduler {
            parts.scheduler = Some(scheduler);
        }
        if let Some(factory) = self.resource_factory {
            parts.body_reader = Arc::new(SizeLimitedBodyReader::new(factory));
        }
        if let Some(reader) = self.body_reader {
            parts.body_reader = reader;
        }

        tracing::debug!(
            target: "varcache::builder",
            max_object_size = self.config.max_object_size,
            max_entries = self.config.max_entries,
            shared_cache = self.config.shared_cache,
            background_revalidation = parts.scheduler.is_some(),
            "cache assembled"
        );

        Ok(HttpCache::from_parts(self.config, parts))
    }

    /// [`CacheBuilder::build`] wrapped for sharing across threads
    ///
    /// Background revalidation needs the cache behind an `Arc`.
    ///
    /// # Errors
    ///
    /// Same as [`CacheBuilder::build`].
    pub fn build_shared(self) -> Result<Arc<HttpCache>> {
        self.build().map(Arc::new)
    }
}

impl fmt::Debug for CacheBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("config", &self.config)
            .field("custom_storage", &self.storage.is_some())
            .field("resource_factory", &self.resource_factory.is_some())
            .field("body_reader", &self.body_reader.is_some())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
