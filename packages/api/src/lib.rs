//! varcache public API
//!
//! HTTP response cache with content-negotiated variants. Build a cache with
//! the fluent [`CacheBuilder`], then drive it from a request pipeline:
//!
//! ```no_run
//! use varcache::Cache;
//!
//! let cache = Cache::builder()
//!     .max_object_size(64 * 1024)
//!     .max_entries(10_000)
//!     .private()
//!     .build_shared()
//!     .expect("valid cache configuration");
//!
//! let host = varcache::HttpHost::https("example.com");
//! let request = varcache::http::Request::get("/index.html").body(()).expect("request");
//! if let Some(entry) = cache.lookup(&host, &request).expect("storage available") {
//!     let _response = cache.generator().render(&entry);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

pub use builder::{CacheBuilder, SchedulerChoice};

// Engine types a pipeline works with
pub use varcache_engine::prelude::*;
pub use varcache_engine::{body, cache, config, error, resource, scheduler};

// The request and response types every operation takes
pub use http;

/// Main varcache entry point providing static builder methods
pub struct Cache;

impl Cache {
    /// Start a builder with default configuration
    #[must_use]
    pub fn builder() -> CacheBuilder {
        CacheBuilder::new()
    }

    /// Start a builder from an existing configuration
    #[must_use]
    pub fn with_config(config: CacheConfig) -> CacheBuilder {
        CacheBuilder::from_config(config)
    }

    /// Build a cache with default configuration and collaborators
    ///
    /// # Errors
    ///
    /// Returns a scheduler error if the revalidation workers cannot start.
    pub fn new() -> Result<HttpCache> {
        CacheBuilder::new().build()
    }
}

/// Start a builder with default configuration
///
/// Shorthand for `CacheBuilder::new()`
#[must_use]
pub fn builder() -> CacheBuilder {
    CacheBuilder::new()
}
