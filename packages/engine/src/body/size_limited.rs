//! Default `BodyReader`

use std::io::Read;
use std::sync::Arc;

use bytes::Bytes;
use http::Request;

use super::{BodyReader, Captured, OriginBody};
use crate::error::{self, Result};
use crate::resource::{HeapResourceFactory, ResourceFactory};

/// Buffers up to `max_bytes + 1` bytes to tell a complete body from an oversized one
#[derive(Debug, Clone)]
pub struct SizeLimitedBodyReader {
    factory: Arc<dyn ResourceFactory>,
}

impl Default for SizeLimitedBodyReader {
    fn default() -> Self {
        Self::new(Arc::new(HeapResourceFactory))
    }
}

impl SizeLimitedBodyReader {
    #[must_use]
    pub fn new(factory: Arc<dyn ResourceFactory>) -> Self {
        Self { factory }
    }

    #[must_use]
    pub fn factory(&self) -> &Arc<dyn ResourceFactory> {
        &self.factory
    }
}

impl BodyReader for SizeLimitedBodyReader {
    fn capture(&self, request: &Request<()>, mut body: OriginBody, max_bytes: u64) -> Result<Captured> {
        let mut buffer = Vec::new();
        body.by_ref()
            .take(max_bytes.saturating_add(1))
            .read_to_end(&mut buffer)
            .map_err(error::body)?;

        if buffer.len() as u64 > max_bytes {
            tracing::debug!(
                target: "varcache::body",
                uri = %request.uri(),
                max_bytes,
                "body exceeds object size limit"
            );
            return Ok(Captured::LimitReached {
                prefix: Bytes::from(buffer),
                remainder: body,
            });
        }

        let resource = self
            .factory
            .generate(&request.uri().to_string(), Bytes::from(buffer))?;
        Ok(Captured::Complete(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::body::CacheBody;
    use crate::resource::read_all;

    fn request() -> Request<()> {
        Request::get("http://example.com/r").body(()).unwrap()
    }

    fn origin(content: &[u8]) -> OriginBody {
        Box::new(Cursor::new(content.to_vec()))
    }

    #[test]
    fn test_body_within_limit_is_complete() {
        let reader = SizeLimitedBodyReader::default();
        match reader.capture(&request(), origin(b"12345"), 5).unwrap() {
            Captured::Complete(resource) => {
                assert_eq!(read_all(resource.as_ref()).unwrap(), Bytes::from_static(b"12345"));
            }
            other => panic!("expected complete capture, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_body_keeps_every_byte() {
        let reader = SizeLimitedBodyReader::default();
        let captured = reader.capture(&request(), origin(b"0123456789"), 4).unwrap();
        assert!(captured.is_limit_reached());

        let Captured::LimitReached { prefix, remainder } = captured else {
            unreachable!()
        };
        assert_eq!(prefix.len(), 5);
        let body = CacheBody::Chained { prefix, remainder };
        assert_eq!(body.into_bytes().unwrap(), Bytes::from_static(b"0123456789"));
    }

    #[test]
    fn test_empty_body_with_zero_limit() {
        let reader = SizeLimitedBodyReader::default();
        let captured = reader.capture(&request(), origin(b""), 0).unwrap();
        assert!(!captured.is_limit_reached());
    }
}
