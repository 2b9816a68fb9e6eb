//! Conditional and unconditional revalidation requests

use std::collections::HashMap;

use http::header::{
    CACHE_CONTROL, ETAG, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE,
    IF_UNMODIFIED_SINCE, LAST_MODIFIED, PRAGMA,
};
use http::{HeaderValue, Request};

use super::cache_entry::{CacheEntry, Variant};
use super::validity::ValidityPolicy;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionalRequestBuilder;

impl ConditionalRequestBuilder {
    /// Revalidate `entry` with its validators
    #[must_use]
    pub fn conditional(request: &Request<()>, entry: &CacheEntry) -> Request<()> {
        let mut conditional = copy_head(request);
        let headers = conditional.headers_mut();

        if let Some(etag) = entry.first_header(&ETAG) {
            headers.insert(IF_NONE_MATCH, etag.clone());
        }
        if let Some(last_modified) = entry.first_header(&LAST_MODIFIED) {
            headers.insert(IF_MODIFIED_SINCE, last_modified.clone());
        }
        if ValidityPolicy::must_revalidate(entry) || ValidityPolicy::proxy_revalidate(entry) {
            headers.append(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        }

        conditional
    }

    /// Ask the origin which of the known `variants` is current
    #[must_use]
    pub fn conditional_for_variants(
        request: &Request<()>,
        variants: &HashMap<String, Variant>,
    ) -> Request<()> {
        let mut etags: Vec<&str> = variants.keys().map(String::as_str).collect();
        etags.sort_unstable();

        let mut conditional = copy_head(request);
        if etags.is_empty() {
            return conditional;
        }
        if let Ok(value) = HeaderValue::from_str(&etags.join(", ")) {
            conditional.headers_mut().insert(IF_NONE_MATCH, value);
        }
        conditional
    }

    /// Force an end-to-end reload
    #[must_use]
    pub fn unconditional(request: &Request<()>) -> Request<()> {
        let mut unconditional = copy_head(request);
        let headers = unconditional.headers_mut();
        for name in [IF_RANGE, IF_MATCH, IF_NONE_MATCH, IF_UNMODIFIED_SINCE, IF_MODIFIED_SINCE] {
            headers.remove(name);
        }
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        unconditional
    }
}

/// Owned copy of a request head
pub(crate) fn copy_head(request: &Request<()>) -> Request<()> {
    let mut copy = Request::new(());
    *copy.method_mut() = request.method().clone();
    *copy.uri_mut() = request.uri().clone();
    *copy.version_mut() = request.version();
    *copy.headers_mut() = request.headers().clone();
    copy
}
