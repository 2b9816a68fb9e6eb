use std::fmt;

/// A marker type to indicate that a storage backend ran out of update retries.
#[derive(Debug)]
pub struct UpdateRetriesExhausted;

impl fmt::Display for UpdateRetriesExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("update retries exhausted")
    }
}

impl std::error::Error for UpdateRetriesExhausted {}

/// A marker type to indicate that the revalidation queue is full.
#[derive(Debug)]
pub struct QueueFull;

impl fmt::Display for QueueFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("revalidation queue full")
    }
}

impl std::error::Error for QueueFull {}

/// A marker type to indicate that the scheduler no longer accepts work.
#[derive(Debug)]
pub struct SchedulerClosed;

impl fmt::Display for SchedulerClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scheduler closed")
    }
}

impl std::error::Error for SchedulerClosed {}
