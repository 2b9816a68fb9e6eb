use std::io::Cursor;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use varcache::http::{Request, Response, StatusCode};
use varcache::resource::read_all;
use varcache::{Cache, CacheBuilder, CacheConfig, HttpHost, MemoryStorage, OriginBody};

fn origin(body: &'static [u8]) -> Response<OriginBody> {
    let body: OriginBody = Box::new(Cursor::new(body));
    Response::builder().status(StatusCode::OK).body(body).unwrap()
}

#[test]
fn test_defaults_build() {
    let cache = Cache::builder().build().unwrap();
    assert_eq!(cache.config(), &CacheConfig::default());
    assert!(cache.can_revalidate_in_background());
}

#[test]
fn test_setters_reach_config() {
    let cache = Cache::builder()
        .max_object_size(1024)
        .max_entries(10)
        .private()
        .heuristic(0.2, Duration::from_secs(60))
        .no_background_revalidation()
        .build()
        .unwrap();

    let config = cache.config();
    assert_eq!(config.max_object_size, 1024);
    assert_eq!(config.max_entries, 10);
    assert!(!config.shared_cache);
    assert!(config.heuristic_caching_enabled);
    assert_eq!(config.heuristic_default_lifetime, Duration::from_secs(60));
    assert!(!cache.can_revalidate_in_background());
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = Cache::builder().max_object_size(0).build().unwrap_err();
    assert!(err.is_config());

    let err = Cache::builder()
        .heuristic(2.0, Duration::ZERO)
        .build()
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_json_configuration() {
    let builder = CacheBuilder::from_json(
        r#"{ "max_object_size": 2048, "shared_cache": false, "revalidation_workers": 0 }"#,
    )
    .unwrap();
    assert_eq!(builder.config().max_object_size, 2048);
    assert!(!builder.config().shared_cache);
    // omitted fields keep their defaults
    assert_eq!(builder.config().max_entries, CacheConfig::default().max_entries);

    let cache = builder.build().unwrap();
    assert!(!cache.can_revalidate_in_background());
}

#[test]
fn test_malformed_json_is_a_config_error() {
    let err = CacheBuilder::from_json("{ max_object_size: ").unwrap_err();
    assert!(err.is_config());

    let err = CacheBuilder::from_json_value(serde_json::json!({ "heuristic_coefficient": 3.5 }))
        .unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_custom_storage_is_used() {
    let storage = Arc::new(MemoryStorage::new(5));
    let cache = Cache::builder()
        .storage(storage.clone())
        .no_background_revalidation()
        .build()
        .unwrap();

    let host = HttpHost::http("example.com");
    let request = Request::get("/a").body(()).unwrap();
    let now = SystemTime::now();
    cache
        .capture_and_cache(&host, &request, origin(b"stored"), now, now)
        .unwrap();

    assert_eq!(storage.len(), 1);
    assert!(cache.lookup(&host, &request).unwrap().is_some());
}

#[test]
fn test_file_backed_bodies() {
    let directory = std::env::temp_dir().join(format!("varcache-builder-{}", std::process::id()));
    let cache = Cache::builder()
        .file_backed(&directory)
        .unwrap()
        .inline_revalidation()
        .build_shared()
        .unwrap();
    assert!(cache.can_revalidate_in_background());

    let host = HttpHost::https("example.com");
    let request = Request::get("/f").body(()).unwrap();
    let now = SystemTime::now();
    cache
        .capture_and_cache(&host, &request, origin(b"from disk"), now, now)
        .unwrap();

    let entry = cache.lookup(&host, &request).unwrap().unwrap();
    let resource = entry.resource().unwrap();
    assert_eq!(read_all(resource.as_ref()).unwrap(), Bytes::from_static(b"from disk"));
    assert!(std::fs::read_dir(&directory).unwrap().next().is_some());

    let _ = std::fs::remove_dir_all(&directory);
}
