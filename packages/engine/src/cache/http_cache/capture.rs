//! Capturing origin responses into the cache

use std::sync::Arc;
use std::time::SystemTime;

use http::header::CONTENT_LENGTH;
use http::{Method, Request, Response, StatusCode};

use super::core::HttpCache;
use crate::body::{CacheBody, Captured, OriginBody};
use crate::cache::cache_entry::CacheEntry;
use crate::cache::response_generator::ResponseGenerator;
use crate::error::Result;
use crate::http::HttpHost;
use crate::http::headers::first_str;
use crate::telemetry::CacheStats;

impl HttpCache {
    /// Read the origin body, store the response and return what the client should see
    ///
    /// An oversized body is passed through uncached. A 200 or 206 whose body
    /// does not match its `Content-Length` becomes a 502, except in answer
    /// to HEAD.
    ///
    /// # Errors
    ///
    /// Returns a body or resource error if capture fails, or a storage error.
    pub fn capture_and_cache(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        response: Response<OriginBody>,
        sent_at: SystemTime,
        received_at: SystemTime,
    ) -> Result<Response<CacheBody>> {
        let (parts, body) = response.into_parts();

        let resource = match self
            .body_reader
            .capture(request, body, self.config.max_object_size)?
        {
            Captured::Complete(resource) => resource,
            Captured::LimitReached { prefix, remainder } => {
                CacheStats::record(&self.stats.oversized);
                tracing::debug!(
                    target: "varcache::cache",
                    uri = %request.uri(),
                    max_object_size = self.config.max_object_size,
                    "passing oversized response through"
                );
                return Ok(Response::from_parts(parts, CacheBody::Chained { prefix, remainder }));
            }
        };

        // A HEAD response declares the length of a body it never sends
        let has_body = request.method() != Method::HEAD;
        if has_body && matches!(parts.status, StatusCode::OK | StatusCode::PARTIAL_CONTENT) {
            let declared = first_str(&parts.headers, &CONTENT_LENGTH)
                .and_then(|value| value.trim().parse::<u64>().ok());
            if let Some(declared) = declared.filter(|declared| *declared != resource.len()) {
                let actual = resource.len();
                resource.dispose();
                CacheStats::record(&self.stats.incomplete);
                tracing::warn!(
                    target: "varcache::cache",
                    uri = %request.uri(),
                    declared,
                    actual,
                    "incomplete response"
                );
                return Ok(ResponseGenerator::incomplete_response(declared, actual));
            }
        }

        let entry = Arc::new(CacheEntry::from_parts(sent_at, received_at, &parts, Some(resource)));
        self.store_full_response(host, request, entry.clone())?;
        Ok(self.generator.render(&entry))
    }
}
