//! Invalidation of entries affected by unsafe requests
//!
//! Besides the request target itself, an unsafe request may change the
//! resources it names in `Content-Location` and `Location`. Those are only
//! touched when they live on the same origin as the request.

use std::sync::Arc;

use http::header::{CONTENT_LOCATION, LOCATION};
use http::{HeaderMap, HeaderName, Method, Request, Response};
use url::Url;

use super::cache_entry::CacheEntry;
use super::cache_key::KeyGenerator;
use super::storage::CacheStorage;
use crate::error::Result;
use crate::http::HttpHost;
use crate::http::httpdate;

pub trait Invalidator: Send + Sync {
    /// Remove what an unsafe `request` may have changed, returning how many entries went
    ///
    /// # Errors
    ///
    /// Returns a storage error if an entry cannot be read or removed.
    fn invalidate(&self, host: &HttpHost, request: &Request<()>) -> Result<usize>;

    /// Remove what the successful `response` to an unsafe `request` reports as changed
    ///
    /// Returns how many entries were removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if an entry cannot be read or removed.
    fn invalidate_for_response(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        response: &Response<()>,
    ) -> Result<usize>;
}

/// Storage-backed `Invalidator`
pub struct DefaultInvalidator {
    storage: Arc<dyn CacheStorage>,
    keys: Arc<dyn KeyGenerator>,
}

impl DefaultInvalidator {
    pub fn new(storage: Arc<dyn CacheStorage>, keys: Arc<dyn KeyGenerator>) -> Self {
        Self { storage, keys }
    }

    /// Remove `key` if it holds an entry
    fn remove_existing(&self, key: &str) -> Result<usize> {
        if self.storage.get(key)?.is_none() {
            return Ok(0);
        }
        self.storage.remove(key)?;
        Ok(1)
    }

    fn remove_with_variants(&self, key: &str) -> Result<usize> {
        let Some(entry) = self.storage.get(key)? else {
            return Ok(0);
        };
        let mut removed = 1;
        for variant_key in entry.variant_map().values() {
            removed += self.remove_existing(variant_key)?;
        }
        self.storage.remove(key)?;
        Ok(removed)
    }

    /// Cache key of `location` resolved against `base`, if it is on the same origin
    fn related_key(&self, host: &HttpHost, base: &Url, location: &str) -> Option<String> {
        let target = base.join(location).ok()?;
        if !same_origin(base, &target) {
            return None;
        }

        let request = Request::get(target.as_str()).body(()).ok()?;
        Some(self.keys.primary_key(host, &request))
    }

    fn related_keys<'a>(
        &'a self,
        host: &'a HttpHost,
        base: &'a Url,
        headers: &'a HeaderMap,
    ) -> impl Iterator<Item = String> + 'a {
        [CONTENT_LOCATION, LOCATION]
            .into_iter()
            .filter_map(move |name: HeaderName| headers.get(name))
            .filter_map(|value| value.to_str().ok())
            .filter_map(move |location| self.related_key(host, base, location))
    }
}

impl std::fmt::Debug for DefaultInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultInvalidator").finish_non_exhaustive()
    }
}

impl Invalidator for DefaultInvalidator {
    fn invalidate(&self, host: &HttpHost, request: &Request<()>) -> Result<usize> {
        if !invalidates(request.method()) {
            return Ok(0);
        }

        let primary = self.keys.primary_key(host, request);
        tracing::debug!(target: "varcache::invalidator", key = %primary, method = %request.method(), "invalidating");
        let mut removed = self.remove_with_variants(&primary)?;

        let Ok(base) = Url::parse(&primary) else {
            return Ok(removed);
        };
        for key in self.related_keys(host, &base, request.headers()) {
            if key != primary {
                removed += self.remove_existing(&key)?;
            }
        }
        Ok(removed)
    }

    fn invalidate_for_response(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        response: &Response<()>,
    ) -> Result<usize> {
        if !invalidates(request.method()) || !response.status().is_success() {
            return Ok(0);
        }

        let primary = self.keys.primary_key(host, request);
        let Ok(base) = Url::parse(&primary) else {
            return Ok(0);
        };

        let mut removed = 0;
        for key in self.related_keys(host, &base, response.headers()) {
            let Some(entry) = self.storage.get(&key)? else {
                continue;
            };
            if response_older_than(response.headers(), &entry) || !etags_differ(response.headers(), &entry) {
                continue;
            }
            tracing::debug!(target: "varcache::invalidator", key = %key, "invalidating location target");
            self.storage.remove(&key)?;
            removed += 1;
        }
        Ok(removed)
    }
}

fn invalidates(method: &Method) -> bool {
    *method != Method::GET && *method != Method::HEAD
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str().map(str::to_ascii_lowercase) == b.host_str().map(str::to_ascii_lowercase)
        && a.port_or_known_default() == b.port_or_known_default()
}

fn response_older_than(headers: &HeaderMap, entry: &CacheEntry) -> bool {
    let response_date = headers.get(http::header::DATE).and_then(httpdate::parse_header);
    match (response_date, entry.date()) {
        (Some(response_date), Some(entry_date)) => response_date < entry_date,
        _ => false,
    }
}

/// Both sides carry an ETag and they differ
fn etags_differ(headers: &HeaderMap, entry: &CacheEntry) -> bool {
    let response_etag = headers.get(http::header::ETAG).and_then(|value| value.to_str().ok());
    match (response_etag, entry.etag()) {
        (Some(response_etag), Some(entry_etag)) => response_etag != entry_etag,
        _ => false,
    }
}
