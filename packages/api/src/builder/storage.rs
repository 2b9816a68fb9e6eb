//! Storage backend and body capture

use std::path::PathBuf;
use std::sync::Arc;

use varcache_engine::body::BodyReader;
use varcache_engine::cache::CacheStorage;
use varcache_engine::error::Result;
use varcache_engine::resource::{FileResourceFactory, ResourceFactory};

use crate::builder::core::CacheBuilder;

impl CacheBuilder {
    /// Use `storage` instead of the in-memory default
    ///
    /// `max_entries` no longer applies; the backend decides capacity.
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn CacheStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Keep captured bodies wherever `factory` puts them
    #[must_use]
    pub fn resource_factory(mut self, factory: Arc<dyn ResourceFactory>) -> Self {
        self.resource_factory = Some(factory);
        self
    }

    /// Write captured bodies to files under `directory`
    ///
    /// # Errors
    ///
    /// Returns a resource error if the directory cannot be created.
    pub fn file_backed(self, directory: impl Into<PathBuf>) -> Result<Self> {
        let factory = FileResourceFactory::new(directory)?;
        tracing::debug!(
            target: "varcache::builder",
            directory = %factory.directory().display(),
            "file-backed bodies"
        );
        Ok(self.resource_factory(Arc::new(factory)))
    }

    /// Replace body capture entirely
    ///
    /// Takes precedence over [`CacheBuilder::resource_factory`].
    #[must_use]
    pub fn body_reader(mut self, reader: Arc<dyn BodyReader>) -> Self {
        self.body_reader = Some(reader);
        self
    }
}
