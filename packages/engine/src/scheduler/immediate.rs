//! Inline scheduler

use super::{RevalidationTask, Scheduler};
use crate::error::Result;

/// Runs each task on the calling thread before returning
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, task: RevalidationTask) -> Result<()> {
        tracing::trace!(target: "varcache::scheduler", identifier = task.identifier(), "running inline");
        task.run();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_runs_before_returning() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        ImmediateScheduler
            .schedule(RevalidationTask::new("k", move || flag.store(true, Ordering::SeqCst)))
            .unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }
}
