//! In-memory cache storage
//!
//! Bounded, concurrent storage built on a sharded `DashMap`:
//!
//! - `core`: `MemoryStorage` struct and construction
//! - `operations`: the `CacheStorage` implementation
//! - `eviction`: least-recently-used eviction once capacity is exceeded
//!
//! `update` runs its merge under the shard lock of the key, so merges of
//! the same key are serialized while unrelated keys proceed in parallel.

pub mod core;
pub mod eviction;
pub mod operations;

pub use self::core::MemoryStorage;
