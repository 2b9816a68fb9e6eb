//! Background revalidation settings

use std::sync::Arc;

use varcache_engine::scheduler::{ImmediateScheduler, Scheduler};

use crate::builder::core::{CacheBuilder, SchedulerChoice};

impl CacheBuilder {
    /// Revalidate on a pool of `workers` threads with room for `queue_size` pending tasks
    #[must_use]
    pub fn revalidation_pool(mut self, workers: usize, queue_size: usize) -> Self {
        self.config.revalidation_workers = workers;
        self.config.revalidation_queue_size = queue_size;
        self.scheduler = SchedulerChoice::Configured;
        self
    }

    /// Run revalidations through `scheduler`
    #[must_use]
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = SchedulerChoice::Custom(scheduler);
        self
    }

    /// Revalidate on the calling thread before returning
    #[must_use]
    pub fn inline_revalidation(self) -> Self {
        self.scheduler(Arc::new(ImmediateScheduler))
    }

    /// Never revalidate in the background
    #[must_use]
    pub fn no_background_revalidation(mut self) -> Self {
        self.scheduler = SchedulerChoice::Disabled;
        self
    }
}
