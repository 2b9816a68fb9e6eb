//! Immutable cache entries
//!
//! A `CacheEntry` records one cached response: the status line, the ordered
//! header list, the body resource and the variant map. Entries are never
//! mutated once shared. Every transition builds a new entry that replaces
//! the old one in storage.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;

use http::header::{CONTENT_LENGTH, DATE, ETAG, VARY};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Version};
use hyper::ext::ReasonPhrase;

use crate::http::headers::{self, HeaderList};
use crate::http::httpdate;
use crate::resource::Resource;

/// One cached HTTP response
#[derive(Debug, Clone)]
pub struct CacheEntry {
    request_date: SystemTime,
    response_date: SystemTime,
    version: Version,
    status: StatusCode,
    reason: Option<ReasonPhrase>,
    headers: HeaderList,
    resource: Option<Arc<dyn Resource>>,
    /// Variant key -> storage key of that variant's entry
    variant_map: BTreeMap<String, String>,
}

impl CacheEntry {
    /// Create an entry with no variants
    ///
    /// `request_date` is when the request that produced the response was
    /// sent, `response_date` when the response arrived.
    pub fn new(
        request_date: SystemTime,
        response_date: SystemTime,
        status: StatusCode,
        headers: HeaderList,
        resource: Option<Arc<dyn Resource>>,
    ) -> Self {
        Self {
            request_date,
            response_date,
            version: Version::HTTP_11,
            status,
            reason: None,
            headers,
            resource,
            variant_map: BTreeMap::new(),
        }
    }

    /// Create an entry from the head of an origin response
    ///
    /// A custom reason phrase carried in the response extensions is kept.
    pub fn from_parts(
        request_date: SystemTime,
        response_date: SystemTime,
        parts: &http::response::Parts,
        resource: Option<Arc<dyn Resource>>,
    ) -> Self {
        let mut entry = Self::new(
            request_date,
            response_date,
            parts.status,
            headers::header_list(&parts.headers),
            resource,
        );
        entry.version = parts.version;
        entry.reason = parts.extensions.get::<ReasonPhrase>().cloned();
        entry
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: ReasonPhrase) -> Self {
        self.reason = Some(reason);
        self
    }

    #[must_use]
    pub fn with_variant_map(mut self, variant_map: BTreeMap<String, String>) -> Self {
        self.variant_map = variant_map;
        self
    }

    /// A copy of this entry whose variant map also points `variant_key` at `cache_key`
    #[must_use]
    pub fn with_variant(&self, variant_key: &str, cache_key: &str) -> Self {
        let mut updated = self.clone();
        updated
            .variant_map
            .insert(variant_key.to_string(), cache_key.to_string());
        updated
    }

    /// A copy of this entry with new headers and timestamps, same body and variants
    #[must_use]
    pub fn with_headers(
        &self,
        headers: HeaderList,
        request_date: SystemTime,
        response_date: SystemTime,
    ) -> Self {
        Self {
            request_date,
            response_date,
            headers,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn request_date(&self) -> SystemTime {
        self.request_date
    }

    #[must_use]
    pub fn response_date(&self) -> SystemTime {
        self.response_date
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase as received, if it differed from the canonical one
    #[must_use]
    pub fn reason(&self) -> Option<&ReasonPhrase> {
        self.reason.as_ref()
    }

    /// Reason phrase to put on the wire
    #[must_use]
    pub fn reason_phrase(&self) -> &str {
        self.reason
            .as_ref()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .or_else(|| self.status.canonical_reason())
            .unwrap_or("")
    }

    /// All headers in stored order
    #[must_use]
    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    /// Headers rebuilt as a `HeaderMap`
    #[must_use]
    pub fn header_map(&self) -> HeaderMap {
        headers::header_map(&self.headers)
    }

    #[must_use]
    pub fn first_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, value)| value)
    }

    pub fn headers_named<'a>(
        &'a self,
        name: &HeaderName,
    ) -> impl Iterator<Item = &'a HeaderValue> + use<'a> {
        let name = name.clone();
        self.headers
            .iter()
            .filter(move |(candidate, _)| *candidate == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains_header(&self, name: &HeaderName) -> bool {
        self.first_header(name).is_some()
    }

    #[must_use]
    pub fn resource(&self) -> Option<&Arc<dyn Resource>> {
        self.resource.as_ref()
    }

    #[must_use]
    pub fn variant_map(&self) -> &BTreeMap<String, String> {
        &self.variant_map
    }

    /// True when this entry is a root pointing at negotiated variants
    #[must_use]
    pub fn has_variants(&self) -> bool {
        !self.variant_map.is_empty()
    }

    /// Request header names this response varies on, lower-cased and sorted
    #[must_use]
    pub fn vary_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = headers::comma_elements(self.headers_named(&VARY))
            .into_iter()
            .map(|field| field.to_ascii_lowercase())
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }

    /// True when the response was content negotiated (declares `Vary`)
    #[must_use]
    pub fn is_negotiated(&self) -> bool {
        !self.vary_fields().is_empty()
    }

    /// Parsed `Date` header
    #[must_use]
    pub fn date(&self) -> Option<SystemTime> {
        self.first_header(&DATE).and_then(httpdate::parse_header)
    }

    /// Entity tag, if present and valid text
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.first_header(&ETAG).and_then(|value| value.to_str().ok())
    }

    /// Declared `Content-Length`, if present and numeric
    #[must_use]
    pub fn declared_length(&self) -> Option<u64> {
        self.first_header(&CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }
}

/// A known variant of a negotiated resource
///
/// Variants are views produced while enumerating a root's variant map; they
/// are never stored themselves.
#[derive(Debug, Clone)]
pub struct Variant {
    variant_key: String,
    cache_key: String,
    entry: Arc<CacheEntry>,
}

impl Variant {
    pub fn new(variant_key: String, cache_key: String, entry: Arc<CacheEntry>) -> Self {
        Self {
            variant_key,
            cache_key,
            entry,
        }
    }

    #[must_use]
    pub fn variant_key(&self) -> &str {
        &self.variant_key
    }

    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    #[must_use]
    pub fn entry(&self) -> &Arc<CacheEntry> {
        &self.entry
    }
}
