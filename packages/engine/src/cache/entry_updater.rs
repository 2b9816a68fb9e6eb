//! Merging revalidation responses into stale entries

use std::time::SystemTime;

use http::header::{CONTENT_ENCODING, CONTENT_LENGTH, WARNING};
use http::{HeaderValue, Response, StatusCode};

use super::cache_entry::CacheEntry;
use crate::error::{self, Result};
use crate::http::headers::HeaderList;
use crate::http::httpdate;

/// Reconciles a stale entry with the head of a revalidation response
pub trait EntryUpdater: Send + Sync {
    /// Build the replacement for `stale` after the origin answered `response`
    ///
    /// # Errors
    ///
    /// Returns an invalid-response error if `response` cannot update an entry.
    fn merge(
        &self,
        stale: &CacheEntry,
        sent_at: SystemTime,
        received_at: SystemTime,
        response: &Response<()>,
    ) -> Result<CacheEntry>;
}

/// Header merge for `304 Not Modified` responses
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEntryUpdater;

impl DefaultEntryUpdater {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn merge_headers(stale: &CacheEntry, response: &Response<()>) -> HeaderList {
        let response_date = response.headers().get(http::header::DATE).and_then(httpdate::parse_header);
        if let (Some(entry_date), Some(response_date)) = (stale.date(), response_date) {
            if entry_date > response_date {
                // The 304 predates what we hold
                return stale.headers().to_vec();
            }
        }

        let replaced = |name: &http::HeaderName| {
            *name != CONTENT_ENCODING
                && *name != CONTENT_LENGTH
                && response.headers().contains_key(name)
        };

        let mut merged: HeaderList = stale
            .headers()
            .iter()
            .filter(|(name, value)| !replaced(name) && !(*name == WARNING && is_1xx_warning(value)))
            .cloned()
            .collect();

        merged.extend(
            response
                .headers()
                .iter()
                .filter(|(name, _)| replaced(name))
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        merged
    }
}

impl EntryUpdater for DefaultEntryUpdater {
    fn merge(
        &self,
        stale: &CacheEntry,
        sent_at: SystemTime,
        received_at: SystemTime,
        response: &Response<()>,
    ) -> Result<CacheEntry> {
        if response.status() != StatusCode::NOT_MODIFIED {
            return Err(error::invalid_response(format!(
                "cannot update a cache entry from a {} response",
                response.status()
            )));
        }

        let headers = Self::merge_headers(stale, response);
        Ok(stale.with_headers(headers, sent_at, received_at))
    }
}

/// Warnings with a 1xx code describe freshness and must go once revalidated
fn is_1xx_warning(value: &HeaderValue) -> bool {
    value
        .to_str()
        .map(|value| {
            let code = value.trim_start().as_bytes();
            code.len() >= 3 && code[0] == b'1' && code[1..3].iter().all(u8::is_ascii_digit)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::Bytes;
    use http::header::{CACHE_CONTROL, DATE, ETAG};

    use crate::resource::HeapResource;

    fn at(seconds: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + seconds)
    }

    fn date(seconds: u64) -> HeaderValue {
        HeaderValue::from_str(&httpdate::fmt_http_date(at(seconds))).unwrap()
    }

    fn stale() -> CacheEntry {
        CacheEntry::new(
            at(0),
            at(1),
            StatusCode::OK,
            vec![
                (DATE, date(0)),
                (ETAG, HeaderValue::from_static("\"v1\"")),
                (CACHE_CONTROL, HeaderValue::from_static("max-age=10")),
                (CONTENT_ENCODING, HeaderValue::from_static("gzip")),
                (WARNING, HeaderValue::from_static("110 - \"Response is Stale\"")),
                (WARNING, HeaderValue::from_static("299 - \"Misc\"")),
            ],
            Some(Arc::new(HeapResource::new(Bytes::from_static(b"body")))),
        )
        .with_variant("{a=b}", "{a=b}http://h:80/")
    }

    fn not_modified(date_header: HeaderValue) -> Response<()> {
        Response::builder()
            .status(StatusCode::NOT_MODIFIED)
            .header(DATE, date_header)
            .header(CACHE_CONTROL, "max-age=60")
            .header(CONTENT_ENCODING, "identity")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_merge_replaces_headers_and_dates() {
        let updated = DefaultEntryUpdater
            .merge(&stale(), at(100), at(101), &not_modified(date(100)))
            .unwrap();

        assert_eq!(updated.request_date(), at(100));
        assert_eq!(updated.response_date(), at(101));
        assert_eq!(updated.first_header(&CACHE_CONTROL).unwrap(), "max-age=60");
        assert_eq!(updated.headers_named(&CACHE_CONTROL).count(), 1);
        assert_eq!(updated.first_header(&DATE), Some(&date(100)));
        assert_eq!(updated.first_header(&CONTENT_ENCODING).unwrap(), "gzip");
        assert_eq!(updated.etag(), Some("\"v1\""));

        let warnings: Vec<_> = updated.headers_named(&WARNING).collect();
        assert_eq!(warnings, vec!["299 - \"Misc\""]);

        assert!(updated.resource().is_some());
        assert!(updated.has_variants());
    }

    #[test]
    fn test_older_response_keeps_entry_headers() {
        let entry = CacheEntry::new(
            at(0),
            at(1),
            StatusCode::OK,
            vec![
                (DATE, date(50)),
                (CACHE_CONTROL, HeaderValue::from_static("max-age=10")),
            ],
            None,
        );
        let updated = DefaultEntryUpdater
            .merge(&entry, at(100), at(101), &not_modified(date(10)))
            .unwrap();
        assert_eq!(updated.headers(), entry.headers());
        assert_eq!(updated.response_date(), at(101));
    }

    #[test]
    fn test_rejects_non_304() {
        let response = Response::builder().status(StatusCode::OK).body(()).unwrap();
        let result = DefaultEntryUpdater.merge(&stale(), at(2), at(3), &response);
        assert!(result.is_err_and(|e| e.is_invalid_response()));
    }
}
