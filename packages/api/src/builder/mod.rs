//! Cache builder API modules
//!
//! Provides the fluent API for assembling an `HttpCache`: limits and
//! freshness settings, storage and body capture, and background
//! revalidation.

pub mod core;
pub mod limits;
pub mod revalidation;
pub mod storage;

pub use self::core::{CacheBuilder, SchedulerChoice};
