//! Response body resources
//!
//! A `Resource` is the disposable byte payload behind a cache entry. The
//! engine only ever asks for its length, opens it for reading, or disposes
//! it. Where the bytes live is decided by the `ResourceFactory` in use.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{self, Result};

pub mod file;
pub mod heap;

pub use file::{FileResource, FileResourceFactory};
pub use heap::{HeapResource, HeapResourceFactory};

/// Owned handle to a cached response body
///
/// Implementations release their backing storage exactly once, either on an
/// explicit `dispose` or when dropped.
pub trait Resource: fmt::Debug + Send + Sync {
    /// Length of the body in bytes
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open a fresh reader over the body
    ///
    /// # Errors
    ///
    /// Returns a resource error if the backing storage is gone or unreadable.
    fn open(&self) -> Result<Box<dyn Read + Send>>;

    /// Release the backing storage; later calls are no-ops
    fn dispose(&self);
}

/// Creates resources for freshly captured bodies
pub trait ResourceFactory: fmt::Debug + Send + Sync {
    /// Materialize `content` captured for the request identified by `request_id`
    ///
    /// # Errors
    ///
    /// Returns a resource error if the backing storage cannot be written.
    fn generate(&self, request_id: &str, content: Bytes) -> Result<Arc<dyn Resource>>;
}

/// Read a whole resource into memory
///
/// # Errors
///
/// Returns a resource error if the resource cannot be opened or read.
pub fn read_all(resource: &dyn Resource) -> Result<Bytes> {
    let mut reader = resource.open()?;
    let mut buffer = Vec::with_capacity(usize::try_from(resource.len()).unwrap_or(0));
    reader.read_to_end(&mut buffer).map_err(error::resource)?;
    Ok(Bytes::from(buffer))
}
