mod common;

use http::{Request, Response, StatusCode};
use varcache_engine::prelude::*;

use common::*;

fn request(method: &str, path: &str, headers: &[(&str, &str)]) -> Request<()> {
    let mut builder = Request::builder().method(method).uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(()).unwrap()
}

fn store(cache: &HttpCache, path: &str, etag: &str) {
    capture(
        cache,
        &get(path),
        origin(StatusCode::OK, &[("etag", etag), ("cache-control", "max-age=60")], b"cached"),
    );
}

#[test]
fn test_post_invalidates_primary_entry() {
    let cache = cache();
    store(&cache, "/r", "\"1\"");
    assert!(cache.lookup(&host(), &get("/r")).unwrap().is_some());

    cache
        .invalidate_for_unsafe_request(&host(), &request("POST", "/r", &[]))
        .unwrap();

    assert!(cache.lookup(&host(), &get("/r")).unwrap().is_none());
    assert_eq!(cache.stats().snapshot().invalidations, 1);
}

#[test]
fn test_safe_methods_do_not_invalidate() {
    let cache = cache();
    store(&cache, "/r", "\"1\"");

    for method in ["GET", "HEAD", "OPTIONS", "TRACE"] {
        cache
            .invalidate_for_unsafe_request(&host(), &request(method, "/r", &[]))
            .unwrap();
    }

    assert!(cache.lookup(&host(), &get("/r")).unwrap().is_some());
    assert_eq!(cache.stats().snapshot().invalidations, 0);
}

#[test]
fn test_invalidate_related_removes_variants_and_locations() {
    let cache = cache();
    capture(
        &cache,
        &get_with("/r", "accept-language", "en"),
        origin(StatusCode::OK, &[("vary", "Accept-Language")], b"en"),
    );
    store(&cache, "/moved", "\"m\"");
    store(&cache, "/listing", "\"l\"");

    let root = cache.storage().get("http://example.com:80/r").unwrap().unwrap();
    let variant_key = root.variant_map().values().next().unwrap().clone();

    cache
        .invalidate_related(
            &host(),
            &request("PUT", "/r", &[("content-location", "/moved"), ("location", "http://elsewhere.org/listing")]),
        )
        .unwrap();

    assert!(cache.storage().get("http://example.com:80/r").unwrap().is_none());
    assert!(cache.storage().get(&variant_key).unwrap().is_none());
    assert!(cache.lookup(&host(), &get("/moved")).unwrap().is_none());
    // different origin, left alone
    assert!(cache.lookup(&host(), &get("/listing")).unwrap().is_some());
    // root, its variant and the content location
    assert_eq!(cache.stats().snapshot().invalidations, 3);
}

#[test]
fn test_response_location_requires_changed_etag() {
    let cache = cache();
    store(&cache, "/same", "\"v1\"");
    store(&cache, "/changed", "\"v1\"");

    let unchanged = Response::builder()
        .status(StatusCode::CREATED)
        .header("content-location", "/same")
        .header("etag", "\"v1\"")
        .body(())
        .unwrap();
    cache
        .invalidate_related_for_response(&host(), &request("POST", "/items", &[]), &unchanged)
        .unwrap();
    assert!(cache.lookup(&host(), &get("/same")).unwrap().is_some());

    let changed = Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/changed")
        .header("etag", "\"v2\"")
        .body(())
        .unwrap();
    cache
        .invalidate_related_for_response(&host(), &request("POST", "/items", &[]), &changed)
        .unwrap();
    assert!(cache.lookup(&host(), &get("/changed")).unwrap().is_none());
}

#[test]
fn test_error_response_invalidates_nothing() {
    let cache = cache();
    store(&cache, "/kept", "\"v1\"");

    let failed = Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("location", "/kept")
        .header("etag", "\"v2\"")
        .body(())
        .unwrap();
    cache
        .invalidate_related_for_response(&host(), &request("DELETE", "/kept", &[]), &failed)
        .unwrap();
    assert!(cache.lookup(&host(), &get("/kept")).unwrap().is_some());
    assert_eq!(cache.stats().snapshot().invalidations, 0);
}

#[test]
fn test_invalidation_count_reflects_removed_entries() {
    let cache = cache();
    store(&cache, "/r", "\"1\"");

    cache.invalidate_related(&host(), &get("/r")).unwrap();
    cache
        .invalidate_related(&host(), &request("HEAD", "/r", &[]))
        .unwrap();
    assert_eq!(cache.stats().snapshot().invalidations, 0);

    cache
        .invalidate_related(&host(), &request("POST", "/missing", &[]))
        .unwrap();
    cache
        .invalidate_for_unsafe_request(&host(), &request("POST", "/missing", &[]))
        .unwrap();
    assert_eq!(cache.stats().snapshot().invalidations, 0);

    cache
        .invalidate_related(&host(), &request("POST", "/r", &[]))
        .unwrap();
    assert_eq!(cache.stats().snapshot().invalidations, 1);
}
