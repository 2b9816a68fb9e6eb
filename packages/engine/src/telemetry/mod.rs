//! Telemetry for the caching engine

pub mod cache_stats;

pub use cache_stats::{CacheStats, CacheStatsSnapshot};
