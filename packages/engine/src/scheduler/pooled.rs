//! Bounded worker pool for background revalidation
//!
//! Tasks go through a bounded `crossbeam-channel` queue to a fixed set of
//! worker threads. An identifier stays registered from the moment its task
//! is accepted until the task has finished, and a second task for the same
//! identifier is dropped during that time.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use dashmap::DashSet;

use super::{RevalidationTask, Scheduler};
use crate::config::CacheConfig;
use crate::error::{self, Result};

pub struct PooledScheduler {
    sender: Option<Sender<RevalidationTask>>,
    pending: Arc<DashSet<String>>,
    workers: Vec<JoinHandle<()>>,
}

impl PooledScheduler {
    /// Start `workers` threads sharing a queue of `queue_size` pending tasks
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `workers` is zero, or a scheduler
    /// error if a worker thread cannot be spawned.
    pub fn new(workers: usize, queue_size: usize) -> Result<Self> {
        if workers == 0 {
            return Err(error::configuration("revalidation pool needs at least one worker"));
        }

        let (sender, receiver) = bounded::<RevalidationTask>(queue_size);
        let pending = Arc::new(DashSet::new());

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let receiver = receiver.clone();
            let pending = pending.clone();
            let handle = thread::Builder::new()
                .name(format!("varcache-revalidate-{index}"))
                .spawn(move || worker_loop(&receiver, &pending))
                .map_err(error::scheduler)?;
            handles.push(handle);
        }

        tracing::debug!(target: "varcache::scheduler", workers, queue_size, "revalidation pool started");

        Ok(Self {
            sender: Some(sender),
            pending,
            workers: handles,
        })
    }

    /// Pool sized by `CacheConfig::revalidation_workers` and `revalidation_queue_size`
    ///
    /// # Errors
    ///
    /// See [`PooledScheduler::new`].
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::new(config.revalidation_workers, config.revalidation_queue_size)
    }

    /// Identifiers accepted and not yet finished
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.len()
    }
}

fn worker_loop(receiver: &Receiver<RevalidationTask>, pending: &DashSet<String>) {
    for task in receiver.iter() {
        let (identifier, job) = task.into_parts();
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!(target: "varcache::scheduler", identifier = %identifier, "revalidation task panicked");
        }
        pending.remove(&identifier);
    }
}

impl Scheduler for PooledScheduler {
    fn schedule(&self, task: RevalidationTask) -> Result<()> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(error::scheduler_closed());
        };

        let identifier = task.identifier().to_string();
        if !self.pending.insert(identifier.clone()) {
            tracing::trace!(target: "varcache::scheduler", identifier = %identifier, "revalidation already pending");
            return Ok(());
        }

        match sender.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.pending.remove(&identifier);
                tracing::warn!(target: "varcache::scheduler", identifier = %identifier, "revalidation queue full");
                Err(error::queue_full(identifier))
            }
            Err(TrySendError::Disconnected(_)) => {
                self.pending.remove(&identifier);
                Err(error::scheduler_closed())
            }
        }
    }
}

impl Drop for PooledScheduler {
    fn drop(&mut self) {
        // Closing the queue lets workers drain it and exit
        self.sender.take();
        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            // The last cache handle can be released by a task on a worker
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                tracing::error!(target: "varcache::scheduler", "revalidation worker exited abnormally");
            }
        }
    }
}

impl std::fmt::Debug for PooledScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledScheduler")
            .field("workers", &self.workers.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Barrier, mpsc};
    use std::time::Duration;

    #[test]
    fn test_runs_tasks_on_workers() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let scheduler = PooledScheduler::new(2, 16).unwrap();
            for i in 0..8 {
                let counter = counter.clone();
                scheduler
                    .schedule(RevalidationTask::new(format!("k{i}"), move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }))
                    .unwrap();
            }
        }
        // Drop joined the workers after the queue drained
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_duplicate_identifier_is_dropped() {
        let scheduler = PooledScheduler::new(1, 4).unwrap();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let started = Arc::new(Barrier::new(2));
        let runs = Arc::new(AtomicUsize::new(0));

        let gate = started.clone();
        let first_runs = runs.clone();
        scheduler
            .schedule(RevalidationTask::new("same", move || {
                gate.wait();
                let _ = release_rx.recv_timeout(Duration::from_secs(5));
                first_runs.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        started.wait();

        let second_runs = runs.clone();
        scheduler
            .schedule(RevalidationTask::new("same", move || {
                second_runs.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        assert_eq!(scheduler.pending(), 1);

        release_tx.send(()).unwrap();
        drop(scheduler);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_full_queue_rejects() {
        let scheduler = PooledScheduler::new(1, 1).unwrap();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let started = Arc::new(Barrier::new(2));

        let gate = started.clone();
        scheduler
            .schedule(RevalidationTask::new("busy", move || {
                gate.wait();
                let _ = release_rx.recv_timeout(Duration::from_secs(5));
            }))
            .unwrap();
        started.wait();

        scheduler.schedule(RevalidationTask::new("queued", || {})).unwrap();
        let rejected = scheduler.schedule(RevalidationTask::new("overflow", || {}));
        assert!(rejected.is_err_and(|e| e.is_queue_full()));

        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_panicking_task_does_not_kill_worker() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let scheduler = PooledScheduler::new(1, 4).unwrap();
            scheduler
                .schedule(RevalidationTask::new("boom", || panic!("origin exploded")))
                .unwrap();
            let after = counter.clone();
            scheduler
                .schedule(RevalidationTask::new("after", move || {
                    after.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_workers_is_a_config_error() {
        assert!(PooledScheduler::new(0, 4).is_err_and(|e| e.is_config()));
    }
}
