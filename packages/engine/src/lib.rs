//! # varcache engine
//!
//! HTTP response caching engine with support for content-negotiated
//! variants. It decides whether a request can be answered from a local
//! store, keys representations that differ by `Vary`, merges revalidation
//! results into stored entries and regenerates wire-correct responses.
//!
//! ## Features
//!
//! - **Variant-aware lookup** through a root entry's variant map
//! - **Atomic merges** of concurrent variant registrations
//! - **Size-capped capture** with pass-through of oversized bodies
//! - **Truncation detection** answered with a synthesized 502
//! - **Invalidation** on unsafe methods and `Location` chains
//! - **Background revalidation** on a bounded worker pool
//!
//! The engine performs no network I/O. The request pipeline that talks to
//! origin servers calls `HttpCache::lookup` before a request and one of
//! the store, update or invalidate operations afterwards.

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod body;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod scheduler;
pub mod telemetry;

// Prelude with canonical types
pub mod prelude;

pub use crate::prelude::*;
