//! HTTP response caching with content negotiation
//!
//! This module provides the caching engine and its default collaborators:
//! - Immutable entries replaced atomically, shared as `Arc<CacheEntry>`
//! - Primary keys from canonical URIs, variant keys from `Vary` headers
//! - Pluggable storage with an atomic read-modify-write `update`
//! - RFC 7234 age and freshness computation
//! - Invalidation on unsafe methods and along `Location` chains

pub mod cache_entry;
pub mod cache_key;
pub mod caching_policy;
pub mod conditional;
pub mod entry_updater;
pub mod http_cache;
pub mod invalidator;
pub mod memory_storage;
pub mod response_generator;
pub mod storage;
pub mod validity;

// Re-export all public types
pub use cache_entry::{CacheEntry, Variant};
pub use cache_key::{DefaultKeyGenerator, KeyGenerator};
pub use caching_policy::ResponseCachingPolicy;
pub use conditional::ConditionalRequestBuilder;
pub use entry_updater::{DefaultEntryUpdater, EntryUpdater};
pub use http_cache::{CacheParts, HttpCache, OriginExchange};
pub use invalidator::{DefaultInvalidator, Invalidator};
pub use memory_storage::MemoryStorage;
pub use response_generator::ResponseGenerator;
pub use storage::{CacheStorage, MergeFn};
pub use validity::{MAX_AGE, ValidityPolicy};
