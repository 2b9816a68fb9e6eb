//! HTTP primitives the cache reads
//!
//! Header-field semantics are limited to what caching needs: dates,
//! `Cache-Control` directives, ordered header lists and origin hosts.

pub mod cache_control;
pub mod headers;
pub mod host;
pub mod http_date;

pub use cache_control::CacheControl;
pub use headers::{HeaderList, header_list, header_map};
pub use host::HttpHost;
pub use http_date::{HttpDateParseError, httpdate};

/// Methods that never invalidate cached entries
pub const SAFE_METHODS: [http::Method; 4] = [
    http::Method::GET,
    http::Method::HEAD,
    http::Method::OPTIONS,
    http::Method::TRACE,
];

/// True for methods that leave the origin state untouched
#[must_use]
pub fn is_safe_method(method: &http::Method) -> bool {
    SAFE_METHODS.contains(method)
}
