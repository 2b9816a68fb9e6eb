//! Entry age and freshness calculation
//!
//! Implements the RFC 7234 age algorithm over the timestamps recorded in a
//! `CacheEntry`. Freshness is never stored; it is recomputed from the entry
//! and the current time whenever it is needed.

use std::time::{Duration, SystemTime};

use http::header::{AGE, CACHE_CONTROL, ETAG, EXPIRES, LAST_MODIFIED};

use super::cache_entry::CacheEntry;
use crate::config::CacheConfig;
use crate::http::cache_control::CacheControl;
use crate::http::httpdate;

/// Upper bound for any computed age (2^31 seconds)
pub const MAX_AGE: Duration = Duration::from_secs(2_147_483_648);

/// Freshness policy derived from the cache configuration
#[derive(Debug, Clone)]
pub struct ValidityPolicy {
    shared_cache: bool,
    heuristic_enabled: bool,
    heuristic_coefficient: f32,
    heuristic_default_lifetime: Duration,
}

impl Default for ValidityPolicy {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl ValidityPolicy {
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            shared_cache: config.shared_cache,
            heuristic_enabled: config.heuristic_caching_enabled,
            heuristic_coefficient: config.heuristic_coefficient,
            heuristic_default_lifetime: config.heuristic_default_lifetime,
        }
    }

    /// Age of the entry at `now`, capped at `MAX_AGE`
    #[must_use]
    pub fn current_age(&self, entry: &CacheEntry, now: SystemTime) -> Duration {
        self.corrected_initial_age(entry)
            .saturating_add(Self::resident_time(entry, now))
            .min(MAX_AGE)
    }

    /// `response_date - Date`, or `MAX_AGE` when the entry has no usable `Date`
    #[must_use]
    pub fn apparent_age(entry: &CacheEntry) -> Duration {
        match entry.date() {
            Some(date) => elapsed_between(date, entry.response_date()),
            None => MAX_AGE,
        }
    }

    /// Largest `Age` header value; malformed values count as `MAX_AGE`
    #[must_use]
    pub fn age_header(entry: &CacheEntry) -> Duration {
        entry
            .headers_named(&AGE)
            .map(|value| {
                value
                    .to_str()
                    .ok()
                    .and_then(|value| value.trim().parse::<u64>().ok())
                    .map_or(MAX_AGE, Duration::from_secs)
            })
            .max()
            .unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn corrected_received_age(entry: &CacheEntry) -> Duration {
        Self::apparent_age(entry).max(Self::age_header(entry))
    }

    /// Time the request spent in flight
    #[must_use]
    pub fn response_delay(entry: &CacheEntry) -> Duration {
        elapsed_between(entry.request_date(), entry.response_date())
    }

    #[must_use]
    pub fn corrected_initial_age(&self, entry: &CacheEntry) -> Duration {
        Self::corrected_received_age(entry).saturating_add(Self::response_delay(entry))
    }

    /// Time the entry has spent in this cache
    #[must_use]
    pub fn resident_time(entry: &CacheEntry, now: SystemTime) -> Duration {
        elapsed_between(entry.response_date(), now)
    }

    /// How long the entry stays fresh after it was generated
    #[must_use]
    pub fn freshness_lifetime(&self, entry: &CacheEntry) -> Duration {
        let cc = CacheControl::parse(entry.headers_named(&CACHE_CONTROL));

        if self.shared_cache {
            if let Some(s_maxage) = cc.s_maxage {
                return Duration::from_secs(s_maxage);
            }
        }
        if let Some(max_age) = cc.max_age {
            return Duration::from_secs(max_age);
        }

        if let Some(expires) = entry.first_header(&EXPIRES) {
            // An unparseable Expires means "already expired"
            return match (httpdate::parse_header(expires), entry.date()) {
                (Some(expires), Some(date)) => elapsed_between(date, expires),
                _ => Duration::ZERO,
            };
        }

        if self.heuristic_enabled {
            return self.heuristic_lifetime(entry);
        }

        Duration::ZERO
    }

    /// A fraction of the time since `Last-Modified`, or the configured default
    #[must_use]
    pub fn heuristic_lifetime(&self, entry: &CacheEntry) -> Duration {
        let last_modified = entry.first_header(&LAST_MODIFIED).and_then(httpdate::parse_header);

        match (entry.date(), last_modified) {
            (Some(date), Some(last_modified)) if date > last_modified => {
                elapsed_between(last_modified, date).mul_f32(self.heuristic_coefficient)
            }
            _ => self.heuristic_default_lifetime,
        }
    }

    #[must_use]
    pub fn is_fresh(&self, entry: &CacheEntry, now: SystemTime) -> bool {
        self.current_age(entry, now) < self.freshness_lifetime(entry)
    }

    /// How far past its freshness lifetime the entry is at `now`
    #[must_use]
    pub fn staleness(&self, entry: &CacheEntry, now: SystemTime) -> Duration {
        self.current_age(entry, now)
            .saturating_sub(self.freshness_lifetime(entry))
    }

    /// True when the entry carries a validator usable in a conditional request
    #[must_use]
    pub fn is_revalidatable(entry: &CacheEntry) -> bool {
        entry.contains_header(&ETAG) || entry.contains_header(&LAST_MODIFIED)
    }

    #[must_use]
    pub fn must_revalidate(entry: &CacheEntry) -> bool {
        CacheControl::parse(entry.headers_named(&CACHE_CONTROL)).must_revalidate
    }

    #[must_use]
    pub fn proxy_revalidate(entry: &CacheEntry) -> bool {
        CacheControl::parse(entry.headers_named(&CACHE_CONTROL)).proxy_revalidate
    }

    /// True while a stale entry is inside its `stale-while-revalidate` window
    #[must_use]
    pub fn may_serve_stale_while_revalidating(&self, entry: &CacheEntry, now: SystemTime) -> bool {
        CacheControl::parse(entry.headers_named(&CACHE_CONTROL))
            .stale_while_revalidate
            .is_some_and(|window| self.staleness(entry, now) <= Duration::from_secs(window))
    }

    /// True while a stale entry is inside its `stale-if-error` window
    #[must_use]
    pub fn may_serve_stale_if_error(&self, entry: &CacheEntry, now: SystemTime) -> bool {
        CacheControl::parse(entry.headers_named(&CACHE_CONTROL))
            .stale_if_error
            .is_some_and(|window| self.staleness(entry, now) <= Duration::from_secs(window))
    }
}

/// `later - earlier`, zero if `later` is not after `earlier`
fn elapsed_between(earlier: SystemTime, later: SystemTime) -> Duration {
    later.duration_since(earlier).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    use http::header::DATE;
    use http::{HeaderName, HeaderValue, StatusCode};

    use crate::http::httpdate::fmt_http_date;

    fn at(seconds: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000 + seconds)
    }

    fn header(name: HeaderName, value: String) -> (HeaderName, HeaderValue) {
        (name, HeaderValue::from_str(&value).unwrap())
    }

    fn entry(request: u64, response: u64, headers: Vec<(HeaderName, HeaderValue)>) -> CacheEntry {
        CacheEntry::new(at(request), at(response), StatusCode::OK, headers, None)
    }

    #[test]
    fn test_current_age_combines_all_terms() {
        // Date 2s before receipt, Age 10, 1s in flight, 5s resident
        let e = entry(
            7,
            8,
            vec![
                header(DATE, fmt_http_date(at(6))),
                header(AGE, "10".to_string()),
            ],
        );
        let policy = ValidityPolicy::default();
        assert_eq!(ValidityPolicy::apparent_age(&e), Duration::from_secs(2));
        assert_eq!(ValidityPolicy::corrected_received_age(&e), Duration::from_secs(10));
        assert_eq!(policy.current_age(&e, at(13)), Duration::from_secs(16));
    }

    #[test]
    fn test_missing_date_saturates() {
        let e = entry(0, 0, Vec::new());
        assert_eq!(ValidityPolicy::default().current_age(&e, at(100)), MAX_AGE);
    }

    #[test]
    fn test_freshness_prefers_s_maxage_when_shared() {
        let e = entry(
            0,
            0,
            vec![header(CACHE_CONTROL, "max-age=10, s-maxage=20".to_string())],
        );
        assert_eq!(
            ValidityPolicy::default().freshness_lifetime(&e),
            Duration::from_secs(20)
        );

        let private = ValidityPolicy::new(&CacheConfig {
            shared_cache: false,
            ..CacheConfig::default()
        });
        assert_eq!(private.freshness_lifetime(&e), Duration::from_secs(10));
    }

    #[test]
    fn test_freshness_from_expires() {
        let e = entry(
            0,
            0,
            vec![
                header(DATE, fmt_http_date(at(0))),
                header(EXPIRES, fmt_http_date(at(60))),
            ],
        );
        let policy = ValidityPolicy::default();
        assert_eq!(policy.freshness_lifetime(&e), Duration::from_secs(60));
        assert!(policy.is_fresh(&e, at(30)));
        assert!(!policy.is_fresh(&e, at(61)));
        assert_eq!(policy.staleness(&e, at(70)), Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_expires_is_stale() {
        let e = entry(
            0,
            0,
            vec![
                header(DATE, fmt_http_date(at(0))),
                header(EXPIRES, "0".to_string()),
            ],
        );
        assert_eq!(ValidityPolicy::default().freshness_lifetime(&e), Duration::ZERO);
    }

    #[test]
    fn test_heuristic_lifetime() {
        let e = entry(
            0,
            0,
            vec![
                header(DATE, fmt_http_date(at(1000))),
                header(LAST_MODIFIED, fmt_http_date(at(0))),
            ],
        );
        let policy = ValidityPolicy::new(&CacheConfig {
            heuristic_caching_enabled: true,
            heuristic_coefficient: 0.1,
            ..CacheConfig::default()
        });
        assert_eq!(policy.freshness_lifetime(&e), Duration::from_secs(100));
        assert_eq!(ValidityPolicy::default().freshness_lifetime(&e), Duration::ZERO);
    }

    #[test]
    fn test_stale_while_revalidate_window() {
        let e = entry(
            0,
            0,
            vec![
                header(DATE, fmt_http_date(at(0))),
                header(CACHE_CONTROL, "max-age=10, stale-while-revalidate=5".to_string()),
            ],
        );
        let policy = ValidityPolicy::default();
        assert!(policy.may_serve_stale_while_revalidating(&e, at(14)));
        assert!(!policy.may_serve_stale_while_revalidating(&e, at(16)));
        assert!(!policy.may_serve_stale_if_error(&e, at(14)));
    }

    #[test]
    fn test_revalidation_flags() {
        let e = entry(
            0,
            0,
            vec![
                header(ETAG, "\"v1\"".to_string()),
                header(CACHE_CONTROL, "must-revalidate".to_string()),
            ],
        );
        assert!(ValidityPolicy::is_revalidatable(&e));
        assert!(ValidityPolicy::must_revalidate(&e));
        assert!(!ValidityPolicy::proxy_revalidate(&e));
    }
}
