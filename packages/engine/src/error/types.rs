use std::error::Error as StdError;
use std::fmt;

/// A Result alias where the Err case is `varcache_engine::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors raised by the caching engine and its collaborators.
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    /// Cache key the failing operation was working on
    pub key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Storage backend failed to read or write
    Storage,
    /// Atomic update gave up after the backend's own retries
    UpdateConflict,
    /// Resource could not be created, opened or read
    Resource,
    /// Response body could not be captured
    Body,
    /// Origin response unusable for the requested operation
    InvalidResponse,
    /// Invalid cache configuration
    Config,
    /// Background task could not be scheduled
    Scheduler,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                key: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.inner.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// Get the cache key associated with this error, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.inner.key.as_deref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("varcache::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref key) = self.inner.key {
            f.field("key", key);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            Kind::Storage => f.write_str("cache storage error")?,
            Kind::UpdateConflict => f.write_str("cache update conflict")?,
            Kind::Resource => f.write_str("cache resource error")?,
            Kind::Body => f.write_str("error capturing response body")?,
            Kind::InvalidResponse => f.write_str("invalid origin response")?,
            Kind::Config => f.write_str("invalid cache configuration")?,
            Kind::Scheduler => f.write_str("revalidation scheduling error")?,
        }

        if let Some(ref key) = self.inner.key {
            write!(f, " for key {key}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
