//! Rebuilds outgoing responses from cache entries

use std::time::SystemTime;

use http::header::{
    AGE, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_LOCATION, CONTENT_TYPE, DATE, ETAG, EXPIRES,
    TRANSFER_ENCODING, VARY,
};
use http::{HeaderValue, Response, StatusCode};

use super::cache_entry::CacheEntry;
use super::validity::{MAX_AGE, ValidityPolicy};
use crate::body::CacheBody;
use crate::http::httpdate;

/// Headers a 304 must repeat from the cached entry
const NOT_MODIFIED_HEADERS: [http::HeaderName; 5] =
    [ETAG, CONTENT_LOCATION, EXPIRES, CACHE_CONTROL, VARY];

#[derive(Debug, Clone, Default)]
pub struct ResponseGenerator {
    validity: ValidityPolicy,
}

impl ResponseGenerator {
    #[must_use]
    pub fn new(validity: ValidityPolicy) -> Self {
        Self { validity }
    }

    #[must_use]
    pub fn validity(&self) -> &ValidityPolicy {
        &self.validity
    }

    /// Render `entry` as it would be served now
    #[must_use]
    pub fn render(&self, entry: &CacheEntry) -> Response<CacheBody> {
        self.render_at(entry, SystemTime::now())
    }

    /// Render `entry` as it would be served at `now`
    ///
    /// Status line and headers are copied as stored. `Content-Length` is
    /// added for a resource body unless the entry already frames it, and
    /// `Age` is set whenever the entry is at least one second old.
    #[must_use]
    pub fn render_at(&self, entry: &CacheEntry, now: SystemTime) -> Response<CacheBody> {
        let body = match entry.resource() {
            Some(resource) => CacheBody::Resource(resource.clone()),
            None => CacheBody::Empty,
        };

        let mut response = Response::new(body);
        *response.status_mut() = entry.status();
        *response.version_mut() = entry.version();
        *response.headers_mut() = entry.header_map();
        if let Some(reason) = entry.reason() {
            response.extensions_mut().insert(reason.clone());
        }

        if let Some(resource) = entry.resource() {
            let headers = response.headers();
            if !headers.contains_key(TRANSFER_ENCODING) && !headers.contains_key(CONTENT_LENGTH) {
                response
                    .headers_mut()
                    .insert(CONTENT_LENGTH, HeaderValue::from(resource.len()));
            }
        }

        let age = self.validity.current_age(entry, now).min(MAX_AGE).as_secs();
        if age > 0 {
            response.headers_mut().insert(AGE, HeaderValue::from(age));
        }

        response
    }

    /// A 304 answering a conditional request that `entry` satisfies
    #[must_use]
    pub fn render_not_modified(&self, entry: &CacheEntry) -> Response<CacheBody> {
        let mut response = Response::new(CacheBody::Empty);
        *response.status_mut() = StatusCode::NOT_MODIFIED;
        *response.version_mut() = entry.version();

        let date = match entry.first_header(&DATE) {
            Some(date) => date.clone(),
            None => HeaderValue::from_str(&httpdate::fmt_http_date(SystemTime::now()))
                .unwrap_or_else(|_| HeaderValue::from_static("")),
        };
        let headers = response.headers_mut();
        headers.insert(DATE, date);

        for name in &NOT_MODIFIED_HEADERS {
            for value in entry.headers_named(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        response
    }

    /// A 502 reporting an origin body shorter or longer than it declared
    #[must_use]
    pub fn incomplete_response(declared: u64, actual: u64) -> Response<CacheBody> {
        let message = format!(
            "Received incomplete response with Content-Length {declared} but actual body length {actual}"
        );

        let mut response = Response::new(CacheBody::Empty);
        *response.status_mut() = StatusCode::BAD_GATEWAY;
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert(CONTENT_LENGTH, HeaderValue::from(message.len()));
        *response.body_mut() = CacheBody::Full(message.into());
        response
    }
}
