//! Background revalidation scheduling
//!
//! The cache never spawns work itself. A revalidation is packaged as a
//! `RevalidationTask` and handed to whichever `Scheduler` was configured.

use std::fmt;

use crate::error::Result;

pub mod immediate;
pub mod pooled;

pub use immediate::ImmediateScheduler;
pub use pooled::PooledScheduler;

/// Deferred revalidation of one cache entry
pub struct RevalidationTask {
    identifier: String,
    job: Box<dyn FnOnce() + Send + 'static>,
}

impl RevalidationTask {
    /// `identifier` names the entry being revalidated; schedulers use it to de-duplicate
    pub fn new(identifier: impl Into<String>, job: impl FnOnce() + Send + 'static) -> Self {
        Self {
            identifier: identifier.into(),
            job: Box::new(job),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn run(self) {
        (self.job)();
    }

    pub(crate) fn into_parts(self) -> (String, Box<dyn FnOnce() + Send + 'static>) {
        (self.identifier, self.job)
    }
}

impl fmt::Debug for RevalidationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevalidationTask")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Runs revalidation tasks outside the request path
pub trait Scheduler: Send + Sync {
    /// Accept `task` for execution
    ///
    /// A task whose identifier is already pending may be dropped silently.
    ///
    /// # Errors
    ///
    /// Returns a scheduler error when the task cannot be accepted.
    fn schedule(&self, task: RevalidationTask) -> Result<()>;
}
