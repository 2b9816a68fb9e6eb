//! In-memory resources

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use super::{Resource, ResourceFactory};
use crate::error::{self, Result};

/// Body held in a shared heap buffer
#[derive(Debug)]
pub struct HeapResource {
    content: Mutex<Option<Bytes>>,
    len: u64,
}

impl HeapResource {
    #[must_use]
    pub fn new(content: Bytes) -> Self {
        Self {
            len: content.len() as u64,
            content: Mutex::new(Some(content)),
        }
    }

    /// True once `dispose` has released the buffer
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.content.lock().map_or(true, |content| content.is_none())
    }
}

impl Resource for HeapResource {
    fn len(&self) -> u64 {
        self.len
    }

    fn open(&self) -> Result<Box<dyn Read + Send>> {
        let content = self
            .content
            .lock()
            .map_err(|_| error::resource("heap resource lock poisoned"))?
            .clone()
            .ok_or_else(|| error::resource("heap resource already disposed"))?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn dispose(&self) {
        if let Ok(mut content) = self.content.lock() {
            content.take();
        }
    }
}

/// Factory producing `HeapResource`s
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapResourceFactory;

impl ResourceFactory for HeapResourceFactory {
    fn generate(&self, _request_id: &str, content: Bytes) -> Result<Arc<dyn Resource>> {
        Ok(Arc::new(HeapResource::new(content)))
    }
}
