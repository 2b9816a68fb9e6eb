mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use http::StatusCode;
use varcache_engine::cache::storage::MergeFn;
use varcache_engine::error;
use varcache_engine::prelude::*;

use common::*;

#[test]
fn test_concurrent_variant_registration_loses_nothing() {
    let cache = shared(cache());
    let languages: Vec<String> = (0..16).map(|i| format!("lang-{i}")).collect();

    let handles: Vec<_> = languages
        .iter()
        .cloned()
        .map(|language| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let request = get_with("/shared", "accept-language", &language);
                capture(
                    &cache,
                    &request,
                    origin(StatusCode::OK, &[("vary", "Accept-Language")], language.as_bytes()),
                );
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let root = cache
        .storage()
        .get("http://example.com:80/shared")
        .unwrap()
        .unwrap();
    assert_eq!(root.variant_map().len(), 16);

    for language in &languages {
        let entry = cache
            .lookup(&host(), &get_with("/shared", "accept-language", language))
            .unwrap()
            .expect("every variant reachable");
        assert_eq!(body_of(&entry), bytes::Bytes::from(language.clone()));
    }
}

/// Memory storage whose `update` always gives up
struct ConflictingStorage {
    inner: MemoryStorage,
    attempts: AtomicUsize,
}

impl CacheStorage for ConflictingStorage {
    fn get(&self, key: &str) -> Result<Option<Arc<CacheEntry>>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, entry: Arc<CacheEntry>) -> Result<()> {
        self.inner.put(key, entry)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }

    fn update(&self, key: &str, _merge: &mut MergeFn<'_>) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(error::update_conflict(key))
    }
}

#[test]
fn test_update_conflict_drops_registration() {
    let storage = Arc::new(ConflictingStorage {
        inner: MemoryStorage::new(100),
        attempts: AtomicUsize::new(0),
    });
    let config = config();
    let parts = CacheParts::with_storage(&config, storage.clone()).unwrap();
    let cache = HttpCache::from_parts(config, parts);

    let request = get_with("/c", "accept-language", "en");
    let response = capture(
        &cache,
        &request,
        origin(StatusCode::OK, &[("vary", "Accept-Language")], b"en"),
    );

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(storage.attempts.load(Ordering::SeqCst), 1);
    assert!(storage.get("http://example.com:80/c").unwrap().is_none());
    assert!(cache.lookup(&host(), &request).unwrap().is_none());
    assert_eq!(cache.stats().snapshot().update_failures, 1);
}

/// Storage that fails every read
struct BrokenStorage;

impl CacheStorage for BrokenStorage {
    fn get(&self, _key: &str) -> Result<Option<Arc<CacheEntry>>> {
        Err(error::storage(std::io::Error::other("disk unavailable")))
    }

    fn put(&self, _key: &str, _entry: Arc<CacheEntry>) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn update(&self, _key: &str, _merge: &mut MergeFn<'_>) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_storage_failure_propagates_from_lookup() {
    let config = config();
    let parts = CacheParts::with_storage(&config, Arc::new(BrokenStorage)).unwrap();
    let cache = HttpCache::from_parts(config, parts);

    let result = cache.lookup(&host(), &get("/x"));
    assert!(result.is_err_and(|err| err.is_storage()));
}
