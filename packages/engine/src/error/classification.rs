use std::error::Error as StdError;
use std::io;

use super::helpers::QueueFull;
use super::types::{Error, Kind};

impl Error {
    /// Returns true if the storage backend failed.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self.inner.kind, Kind::Storage)
    }

    /// Returns true if an atomic update was abandoned by the backend.
    #[must_use]
    pub fn is_update_conflict(&self) -> bool {
        matches!(self.inner.kind, Kind::UpdateConflict)
    }

    #[must_use]
    pub fn is_resource(&self) -> bool {
        matches!(self.inner.kind, Kind::Resource)
    }

    #[must_use]
    pub fn is_body(&self) -> bool {
        matches!(self.inner.kind, Kind::Body)
    }

    #[must_use]
    pub fn is_invalid_response(&self) -> bool {
        matches!(self.inner.kind, Kind::InvalidResponse)
    }

    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self.inner.kind, Kind::Config)
    }

    /// Returns true if a revalidation task was rejected because the queue was full.
    #[must_use]
    pub fn is_queue_full(&self) -> bool {
        matches!(self.inner.kind, Kind::Scheduler)
            && self.source().is_some_and(|err| err.is::<QueueFull>())
    }

    /// Returns true if the error originated in an I/O operation.
    #[must_use]
    pub fn is_io(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if err.is::<io::Error>() {
                return true;
            }
            source = err.source();
        }

        false
    }
}
