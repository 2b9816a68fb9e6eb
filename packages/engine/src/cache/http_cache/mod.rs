//! The caching engine
//!
//! `HttpCache` ties storage, key generation, body capture, invalidation and
//! background revalidation together. The external request pipeline calls
//! `lookup` before going to the network and one of the store, update or
//! invalidate operations after the origin answered.

pub mod core;
mod capture;
mod invalidate;
mod lookup;
mod revalidate;
mod store;

pub use self::core::{CacheParts, HttpCache};
pub use revalidate::OriginExchange;
