use super::types::{Error, Kind};
use super::BoxError;

/// Creates an `Error` for a storage backend failure.
pub fn storage<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Storage).with(e.into())
}

/// Creates an `Error` for an update that could not be applied atomically.
pub fn update_conflict(key: impl Into<String>) -> Error {
    Error::new(Kind::UpdateConflict)
        .with(super::helpers::UpdateRetriesExhausted)
        .with_key(key)
}

/// Creates an `Error` for a resource failure.
pub fn resource<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Resource).with(e.into())
}

/// Creates an `Error` for a body capture failure.
pub fn body<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Body).with(e.into())
}

/// Creates an `Error` for an origin response that cannot be used.
pub fn invalid_response<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::InvalidResponse).with(e.into())
}

pub fn configuration<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Config).with(e.into())
}

pub fn scheduler<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Scheduler).with(e.into())
}

/// Creates an `Error` for a full revalidation queue.
pub fn queue_full(identifier: impl Into<String>) -> Error {
    Error::new(Kind::Scheduler)
        .with(super::helpers::QueueFull)
        .with_key(identifier)
}

/// Creates an `Error` for a scheduler whose workers have shut down.
pub fn scheduler_closed() -> Error {
    Error::new(Kind::Scheduler).with(super::helpers::SchedulerClosed)
}
