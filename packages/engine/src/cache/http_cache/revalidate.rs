//! Background revalidation

use std::sync::Arc;
use std::time::SystemTime;

use http::{Request, Response, StatusCode};

use super::core::HttpCache;
use crate::body::OriginBody;
use crate::cache::cache_entry::CacheEntry;
use crate::cache::conditional::{ConditionalRequestBuilder, copy_head};
use crate::error::Result;
use crate::http::HttpHost;
use crate::scheduler::RevalidationTask;
use crate::telemetry::CacheStats;

/// An origin response together with when its request was sent and it arrived
pub struct OriginExchange {
    pub response: Response<OriginBody>,
    pub sent_at: SystemTime,
    pub received_at: SystemTime,
}

impl HttpCache {
    /// Queue a conditional refresh of `entry`
    ///
    /// `fetch` performs the conditional request built from `request` and
    /// `entry`. A 304 is merged into the entry. A cacheable 2xx replaces it,
    /// while an uncacheable one removes it. Anything else leaves the cache
    /// untouched. Returns `false` if no scheduler is
    /// configured or the scheduler refused the task.
    pub fn revalidate_in_background<F>(
        self: &Arc<Self>,
        host: &HttpHost,
        request: &Request<()>,
        entry: Arc<CacheEntry>,
        fetch: F,
    ) -> bool
    where
        F: FnOnce(Request<()>) -> Result<OriginExchange> + Send + 'static,
    {
        let Some(scheduler) = self.scheduler.as_ref() else {
            return false;
        };

        let identifier = self.keys.variant_cache_key(host, request, &entry);
        let conditional = ConditionalRequestBuilder::conditional(request, &entry);
        let original = copy_head(request);
        let host = host.clone();
        let cache = Arc::clone(self);

        let task = RevalidationTask::new(identifier.clone(), move || {
            cache.complete_revalidation(&host, &original, &entry, conditional, fetch);
        });

        match scheduler.schedule(task) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    target: "varcache::cache",
                    key = %identifier,
                    error = %err,
                    "background revalidation not scheduled"
                );
                false
            }
        }
    }

    fn complete_revalidation<F>(
        &self,
        host: &HttpHost,
        request: &Request<()>,
        entry: &CacheEntry,
        conditional: Request<()>,
        fetch: F,
    ) where
        F: FnOnce(Request<()>) -> Result<OriginExchange>,
    {
        let outcome = fetch(conditional).and_then(|exchange| {
            let OriginExchange {
                response,
                sent_at,
                received_at,
            } = exchange;
            let status = response.status();

            if status == StatusCode::NOT_MODIFIED {
                let (parts, _) = response.into_parts();
                let head = Response::from_parts(parts, ());
                self.update_entry(host, request, entry, &head, sent_at, received_at)?;
            } else if status.is_success()
                && !self.policy.is_response_cacheable(request.method(), status, response.headers())
            {
                // The origin no longer allows storing this resource
                let key = self.keys.variant_cache_key(host, request, entry);
                if self.storage.get(&key)?.is_some() {
                    self.storage.remove(&key)?;
                    CacheStats::record(&self.stats.invalidations);
                }
                tracing::debug!(
                    target: "varcache::cache",
                    key = %key,
                    status = status.as_u16(),
                    "revalidation response not cacheable, dropped stale entry"
                );
            } else if status.is_success() {
                self.capture_and_cache(host, request, response, sent_at, received_at)?;
            } else {
                tracing::debug!(
                    target: "varcache::cache",
                    uri = %request.uri(),
                    status = status.as_u16(),
                    "revalidation left entry unchanged"
                );
            }
            Ok(status)
        });

        match outcome {
            Ok(status) => tracing::debug!(
                target: "varcache::cache",
                uri = %request.uri(),
                status = status.as_u16(),
                "revalidated in background"
            ),
            Err(err) => tracing::warn!(
                target: "varcache::cache",
                uri = %request.uri(),
                error = %err,
                "background revalidation failed"
            ),
        }
    }
}
