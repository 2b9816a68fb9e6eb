//! Which origin responses may be stored

use http::header::{CACHE_CONTROL, CONTENT_LENGTH, DATE, EXPIRES, VARY};
use http::{HeaderMap, Method, StatusCode};

use crate::config::CacheConfig;
use crate::http::cache_control::CacheControl;
use crate::http::headers::{comma_elements, first_str};

/// Statuses cacheable without explicit freshness information
///
/// 206 is left out: partial content is never combined into full entries.
const CACHEABLE_BY_DEFAULT: [u16; 10] = [200, 203, 204, 300, 301, 404, 405, 410, 414, 501];

#[derive(Debug, Clone)]
pub struct ResponseCachingPolicy {
    max_object_size: u64,
    shared_cache: bool,
}

impl ResponseCachingPolicy {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            max_object_size: config.max_object_size,
            shared_cache: config.shared_cache,
        }
    }

    /// True if a response with this status and headers, answering `method`, may be stored
    #[must_use]
    pub fn is_response_cacheable(&self, method: &Method, status: StatusCode, headers: &HeaderMap) -> bool {
        if *method != Method::GET && *method != Method::HEAD {
            return Self::reject(method, status, "method");
        }

        let cc = CacheControl::parse(headers.get_all(CACHE_CONTROL));
        let explicit = cc.has_explicit_lifetime() || headers.contains_key(EXPIRES);
        if !CACHEABLE_BY_DEFAULT.contains(&status.as_u16()) && !explicit {
            return Self::reject(method, status, "status");
        }

        if cc.no_store {
            return Self::reject(method, status, "no-store");
        }
        if self.shared_cache && cc.private {
            return Self::reject(method, status, "private");
        }

        if comma_elements(headers.get_all(VARY)).iter().any(|field| field == "*") {
            return Self::reject(method, status, "vary-star");
        }

        let declared = first_str(headers, &CONTENT_LENGTH).and_then(|value| value.trim().parse::<u64>().ok());
        if declared.is_some_and(|length| length > self.max_object_size) {
            return Self::reject(method, status, "too-large");
        }

        if headers.get_all(DATE).iter().count() > 1 {
            return Self::reject(method, status, "multiple-dates");
        }

        true
    }

    fn reject(method: &Method, status: StatusCode, reason: &'static str) -> bool {
        tracing::trace!(
            target: "varcache::policy",
            %method,
            status = status.as_u16(),
            reason,
            "response not cacheable"
        );
        false
    }
}

impl Default for ResponseCachingPolicy {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
