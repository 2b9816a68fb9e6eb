//! Cache key and variant key generation
//!
//! The primary key identifies a resource regardless of content
//! negotiation. The variant key is derived from the request headers a
//! negotiated entry declares in `Vary`, and prefixed to the primary key to
//! address one representation.

use std::fmt::Write as _;

use http::{HeaderName, Request};

use super::cache_entry::CacheEntry;
use crate::http::headers::joined_values;
use crate::http::host::HttpHost;

/// Maps requests and entries to storage keys
///
/// Implementations must be pure: the same inputs always yield the same key.
pub trait KeyGenerator: Send + Sync {
    /// Key of the resource, ignoring negotiation
    fn primary_key(&self, host: &HttpHost, request: &Request<()>) -> String;

    /// Key distinguishing the representation `request` negotiates for `entry`
    fn variant_key(&self, request: &Request<()>, entry: &CacheEntry) -> String;

    /// Storage key of one negotiated representation
    fn variant_cache_key(&self, host: &HttpHost, request: &Request<()>, entry: &CacheEntry) -> String {
        let primary = self.primary_key(host, request);
        if entry.is_negotiated() {
            format!("{}{primary}", self.variant_key(request, entry))
        } else {
            primary
        }
    }
}

/// Canonical-URI keys with `{name=value&...}` variant prefixes
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultKeyGenerator;

impl DefaultKeyGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Canonical absolute URI of the request target
    ///
    /// Scheme and host are lower case, the port is always explicit and an
    /// empty path becomes `/`. An absolute-form target overrides `host`.
    #[must_use]
    pub fn canonical_uri(host: &HttpHost, request: &Request<()>) -> String {
        let uri = request.uri();
        let target = HttpHost::from_uri(uri).unwrap_or_else(|| host.clone());

        let mut key = format!("{}://{}", target.scheme(), target.hostname());
        if let Some(port) = target.effective_port() {
            let _ = write!(key, ":{port}");
        }

        let path = uri.path();
        key.push_str(if path.is_empty() { "/" } else { path });

        if let Some(query) = uri.query() {
            key.push('?');
            key.push_str(query);
        }

        key
    }
}

impl KeyGenerator for DefaultKeyGenerator {
    fn primary_key(&self, host: &HttpHost, request: &Request<()>) -> String {
        Self::canonical_uri(host, request)
    }

    fn variant_key(&self, request: &Request<()>, entry: &CacheEntry) -> String {
        let pairs: Vec<String> = entry
            .vary_fields()
            .iter()
            .map(|field| {
                let value = HeaderName::from_bytes(field.as_bytes())
                    .map(|name| joined_values(request.headers().get_all(name).iter()))
                    .unwrap_or_default();
                format!(
                    "{}={}",
                    urlencoding::encode(field),
                    urlencoding::encode(&value)
                )
            })
            .collect();

        format!("{{{}}}", pairs.join("&"))
    }
}
