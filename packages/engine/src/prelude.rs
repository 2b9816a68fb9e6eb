//! varcache prelude
//!
//! The types a request pipeline needs to drive the cache.

// Engine and its collaborators
pub use crate::cache::{
    CacheEntry, CacheParts, CacheStorage, ConditionalRequestBuilder, DefaultEntryUpdater,
    DefaultInvalidator, DefaultKeyGenerator, EntryUpdater, HttpCache, Invalidator, KeyGenerator,
    MemoryStorage, OriginExchange, ResponseCachingPolicy, ResponseGenerator, ValidityPolicy, Variant,
};

// Bodies and resources
pub use crate::body::{BodyReader, CacheBody, Captured, OriginBody, SizeLimitedBodyReader};
pub use crate::resource::{
    FileResource, FileResourceFactory, HeapResource, HeapResourceFactory, Resource, ResourceFactory,
};

// Scheduling
pub use crate::scheduler::{ImmediateScheduler, PooledScheduler, RevalidationTask, Scheduler};

// Configuration and errors
pub use crate::config::{CacheConfig, ConfigurationError, Validator};
pub use crate::error::{CacheError, Error, Kind, Result};

pub use crate::http::HttpHost;

// Telemetry types
pub use crate::telemetry::{CacheStats, CacheStatsSnapshot};
