#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use varcache_engine::prelude::*;
use varcache_engine::resource::read_all;

pub fn host() -> HttpHost {
    HttpHost::http("example.com")
}

pub fn config() -> CacheConfig {
    CacheConfig {
        revalidation_workers: 0,
        ..CacheConfig::default()
    }
}

pub fn cache() -> HttpCache {
    HttpCache::new(config()).expect("valid test config")
}

pub fn get(path: &str) -> Request<()> {
    Request::get(path).body(()).unwrap()
}

pub fn get_with(path: &str, name: &str, value: &str) -> Request<()> {
    Request::get(path).header(name, value).body(()).unwrap()
}

pub fn origin(status: StatusCode, headers: &[(&str, &str)], body: &[u8]) -> Response<OriginBody> {
    let mut builder = Response::builder().status(status);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body: OriginBody = Box::new(Cursor::new(body.to_vec()));
    builder.body(body).unwrap()
}

pub fn now() -> SystemTime {
    SystemTime::now()
}

pub fn ago(seconds: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(seconds)
}

pub fn body_of(entry: &CacheEntry) -> Bytes {
    read_all(entry.resource().expect("entry has a body").as_ref()).unwrap()
}

/// Capture `response` for `request` with both timestamps set to now
pub fn capture(
    cache: &HttpCache,
    request: &Request<()>,
    response: Response<OriginBody>,
) -> Response<CacheBody> {
    let at = now();
    cache
        .capture_and_cache(&host(), request, response, at, at)
        .unwrap()
}

pub fn shared(cache: HttpCache) -> Arc<HttpCache> {
    Arc::new(cache)
}
