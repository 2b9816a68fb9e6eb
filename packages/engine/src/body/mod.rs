//! Response bodies and size-limited capture
//!
//! Origin bodies arrive as blocking readers. The `BodyReader` decides how
//! much of one is buffered into a `Resource`; whatever the cache hands back
//! to the caller is a `CacheBody`.

use std::fmt;
use std::io::{Cursor, Read};
use std::sync::Arc;

use bytes::Bytes;
use http::Request;

use crate::error::{self, Result};
use crate::resource::Resource;

pub mod size_limited;

pub use size_limited::SizeLimitedBodyReader;

/// Body of an origin response as received from the execution pipeline
pub type OriginBody = Box<dyn Read + Send>;

/// Body of a response produced by the cache
pub enum CacheBody {
    Empty,
    /// In-memory content, used for synthesized responses
    Full(Bytes),
    /// Content of a cached entry
    Resource(Arc<dyn Resource>),
    /// An uncached pass-through: the bytes already read, then the rest of the origin body
    Chained { prefix: Bytes, remainder: OriginBody },
}

impl CacheBody {
    /// Length of the body, when known without reading it
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        match self {
            Self::Empty => Some(0),
            Self::Full(bytes) => Some(bytes.len() as u64),
            Self::Resource(resource) => Some(resource.len()),
            Self::Chained { .. } => None,
        }
    }

    /// Turn the body into a single reader
    ///
    /// # Errors
    ///
    /// Returns a resource error if a cached resource can no longer be opened.
    pub fn into_reader(self) -> Result<Box<dyn Read + Send>> {
        match self {
            Self::Empty => Ok(Box::new(std::io::empty())),
            Self::Full(bytes) => Ok(Box::new(Cursor::new(bytes))),
            Self::Resource(resource) => resource.open(),
            Self::Chained { prefix, remainder } => Ok(Box::new(Cursor::new(prefix).chain(remainder))),
        }
    }

    /// Read the whole body into memory
    ///
    /// # Errors
    ///
    /// Returns a body error if the underlying reader fails.
    pub fn into_bytes(self) -> Result<Bytes> {
        if let Self::Full(bytes) = self {
            return Ok(bytes);
        }
        let mut reader = self.into_reader()?;
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).map_err(error::body)?;
        Ok(Bytes::from(buffer))
    }
}

impl fmt::Debug for CacheBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            Self::Resource(resource) => f.debug_tuple("Resource").field(resource).finish(),
            Self::Chained { prefix, .. } => f
                .debug_struct("Chained")
                .field("prefix_len", &prefix.len())
                .finish_non_exhaustive(),
        }
    }
}

/// Outcome of capturing an origin body
pub enum Captured {
    /// The whole body fit within the limit
    Complete(Arc<dyn Resource>),
    /// The limit was exceeded; nothing was materialized
    LimitReached { prefix: Bytes, remainder: OriginBody },
}

impl Captured {
    #[must_use]
    pub fn is_limit_reached(&self) -> bool {
        matches!(self, Self::LimitReached { .. })
    }
}

impl fmt::Debug for Captured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete(resource) => f.debug_tuple("Complete").field(resource).finish(),
            Self::LimitReached { prefix, .. } => f
                .debug_struct("LimitReached")
                .field("prefix_len", &prefix.len())
                .finish_non_exhaustive(),
        }
    }
}

/// Reads origin bodies into resources, up to a byte limit
pub trait BodyReader: Send + Sync {
    /// Capture `body` for `request`, reading at most `max_bytes` into a resource
    ///
    /// # Errors
    ///
    /// Returns a body error if reading fails, or a resource error if the
    /// captured bytes cannot be stored.
    fn capture(&self, request: &Request<()>, body: OriginBody, max_bytes: u64) -> Result<Captured>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::HeapResource;

    #[test]
    fn test_chained_body_yields_prefix_then_remainder() {
        let body = CacheBody::Chained {
            prefix: Bytes::from_static(b"hello "),
            remainder: Box::new(Cursor::new(b"world".to_vec())),
        };
        assert_eq!(body.content_length(), None);
        assert_eq!(body.into_bytes().unwrap(), Bytes::from_static(b"hello world"));
    }

    #[test]
    fn test_resource_body_reads_resource() {
        let resource: Arc<dyn Resource> = Arc::new(HeapResource::new(Bytes::from_static(b"abc")));
        let body = CacheBody::Resource(resource);
        assert_eq!(body.content_length(), Some(3));
        assert_eq!(body.into_bytes().unwrap(), Bytes::from_static(b"abc"));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(CacheBody::Empty.content_length(), Some(0));
        assert!(CacheBody::Empty.into_bytes().unwrap().is_empty());
    }
}
