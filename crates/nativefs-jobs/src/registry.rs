//! Job id allocation and per-job listener lifetime.

use crate::{EventBus, EventSubscription, Job, JobHandle};
use nativefs_types::{EventHandler, EventKind, JobId, NativeFsError, Result};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Allocates transfer jobs and routes their events.
///
/// One registry is meant to be shared by every transfer of a process (or of a
/// bridge instance); its counter is the only mutable state shared between
/// jobs. Subscriptions are owned per job, so settling one job never touches
/// another job's listeners.
pub struct JobRegistry {
    next_id: AtomicU64,
    bus: Arc<dyn EventBus>,
}

impl JobRegistry {
    /// Creates a registry routing events through `bus`.
    #[must_use]
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            bus,
        }
    }

    /// Returns the event bus jobs subscribe on.
    #[must_use]
    pub fn bus(&self) -> &Arc<dyn EventBus> {
        &self.bus
    }

    /// Allocates a new job with a fresh id.
    ///
    /// Ids start at 1 and strictly increase; this never blocks and never fails.
    pub fn create_job(&self) -> Job {
        let id = JobId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        debug!(job_id = %id, "job created");
        Job::new(id)
    }

    /// Returns how many job ids have been issued so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    /// Registers `handler` for `kind` events of `job`.
    ///
    /// The subscription is owned by the job and released when it settles.
    pub fn subscribe(&self, job: &mut Job, kind: EventKind, handler: EventHandler) {
        let name = kind.event_name(job.id());
        debug!(job_id = %job.id(), event = %name, "listener registered");
        job.attach(EventSubscription::register(
            Arc::clone(&self.bus),
            name,
            handler,
        ));
    }

    /// Drives `native` to settlement and tears down the job's listeners.
    ///
    /// Listeners are released before the result is returned, whether the
    /// engine succeeded or failed. Engine failures are reported as
    /// [`NativeFsError::TransferFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`NativeFsError::TransferFailed`] if `native` fails.
    pub async fn await_completion<T, F>(mut job: Job, native: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        job.mark_listening();
        let outcome = native.await;
        let released = job.settle(outcome.is_ok());

        match outcome {
            Ok(value) => {
                debug!(job_id = %job.id(), released, "job completed");
                Ok(value)
            }
            Err(cause) => {
                warn!(job_id = %job.id(), released, error = %cause, "job failed");
                Err(NativeFsError::transfer_failed(job.id(), cause))
            }
        }
    }

    /// Runs [`JobRegistry::await_completion`] on a Tokio task.
    ///
    /// Returns immediately with a handle to the job's eventual result.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn<T, F>(&self, job: Job, native: F) -> JobHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let job_id = job.id();
        let task = tokio::spawn(Self::await_completion(job, native));
        JobHandle::new(job_id, task)
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry")
            .field("issued", &self.issued())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LocalEventBus, SubscriptionToken};
    use nativefs_types::{TransferEvent, UploadBegin};
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Bus wrapper counting subscribe and release calls.
    #[derive(Debug, Default)]
    struct SpyBus {
        inner: LocalEventBus,
        subscribed: AtomicUsize,
        released: AtomicUsize,
    }

    impl SpyBus {
        fn balanced(&self) -> bool {
            self.subscribed.load(Ordering::SeqCst) == self.released.load(Ordering::SeqCst)
        }
    }

    impl EventBus for SpyBus {
        fn subscribe(&self, name: &str, handler: EventHandler) -> SubscriptionToken {
            self.subscribed.fetch_add(1, Ordering::SeqCst);
            self.inner.subscribe(name, handler)
        }

        fn release(&self, token: SubscriptionToken) {
            self.released.fetch_add(1, Ordering::SeqCst);
            self.inner.release(token);
        }
    }

    fn registry() -> (Arc<SpyBus>, JobRegistry) {
        let bus = Arc::new(SpyBus::default());
        let registry = JobRegistry::new(bus.clone());
        (bus, registry)
    }

    fn noop() -> EventHandler {
        Arc::new(|_| {})
    }

    #[test]
    fn test_ids_strictly_increase() {
        let (_, registry) = registry();
        assert_eq!(registry.issued(), 0);

        let ids: Vec<JobId> = (0..5).map(|_| registry.create_job().id()).collect();
        assert_eq!(ids[0], JobId::new(1));
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(registry.issued(), 5);
    }

    #[test]
    fn test_concurrent_ids_are_unique() {
        let (_, registry) = registry();
        let ids = Mutex::new(HashSet::new());

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let local: Vec<JobId> =
                        (0..250).map(|_| registry.create_job().id()).collect();
                    ids.lock().unwrap().extend(local);
                });
            }
        });

        assert_eq!(ids.lock().unwrap().len(), 2000);
        assert_eq!(registry.issued(), 2000);
    }

    #[test]
    fn test_subscribe_uses_job_scoped_name() {
        let (bus, registry) = registry();
        let mut job = registry.create_job();
        registry.subscribe(&mut job, EventKind::UploadBegin, noop());
        registry.subscribe(&mut job, EventKind::UploadProgress, noop());

        assert_eq!(job.subscription_count(), 2);
        assert_eq!(bus.inner.listener_count("UploadBegin-1"), 1);
        assert_eq!(bus.inner.listener_count("UploadProgress-1"), 1);
    }

    #[tokio::test]
    async fn test_success_releases_listeners() {
        let (bus, registry) = registry();
        let mut job = registry.create_job();
        registry.subscribe(&mut job, EventKind::DownloadBegin, noop());
        registry.subscribe(&mut job, EventKind::DownloadProgress, noop());

        let value = JobRegistry::await_completion(job, async { Ok(7u32) })
            .await
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(bus.subscribed.load(Ordering::SeqCst), 2);
        assert!(bus.balanced());
        assert_eq!(bus.inner.total_listeners(), 0);
    }

    #[tokio::test]
    async fn test_failure_releases_listeners_and_wraps_cause() {
        let (bus, registry) = registry();
        let mut job = registry.create_job();
        let id = job.id();
        registry.subscribe(&mut job, EventKind::DownloadProgress, noop());

        let result: Result<()> = JobRegistry::await_completion(job, async {
            Err(NativeFsError::Http("connection reset".to_string()))
        })
        .await;

        match result {
            Err(NativeFsError::TransferFailed { job_id, cause }) => {
                assert_eq!(job_id, id);
                assert!(matches!(*cause, NativeFsError::Http(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(bus.balanced());
    }

    #[tokio::test]
    async fn test_events_route_while_listening() {
        let (bus, registry) = registry();
        let mut job = registry.create_job();
        let id = job.id();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        registry.subscribe(
            &mut job,
            EventKind::UploadBegin,
            Arc::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let event = TransferEvent::UploadBegin(UploadBegin { job_id: id });
        let spy = Arc::clone(&bus);
        let during = event.clone();
        JobRegistry::await_completion(job, async move {
            spy.inner.emit(&during);
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(bus.inner.emit(&event), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spawned_panic_still_releases() {
        let (bus, registry) = registry();
        let mut job = registry.create_job();
        registry.subscribe(&mut job, EventKind::DownloadBegin, noop());

        let handle = registry.spawn(job, async {
            let explode = true;
            if explode {
                panic!("engine blew up");
            }
            Ok(())
        });
        let id = handle.job_id();

        let result: Result<()> = handle.await;
        assert!(matches!(
            result,
            Err(NativeFsError::TransferFailed { job_id, .. }) if job_id == id
        ));
        assert!(bus.balanced());
        assert_eq!(bus.inner.total_listeners(), 0);
    }

    #[tokio::test]
    async fn test_dropped_handle_still_cleans_up() {
        let (bus, registry) = registry();
        let mut job = registry.create_job();
        registry.subscribe(&mut job, EventKind::DownloadProgress, noop());

        let (finish_tx, finish_rx) = tokio::sync::oneshot::channel::<()>();
        let handle = registry.spawn(job, async move {
            let _ = finish_rx.await;
            Ok(())
        });
        drop(handle);
        assert_eq!(bus.inner.total_listeners(), 1);

        finish_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while !bus.balanced() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("listeners were not released");
        assert_eq!(bus.inner.total_listeners(), 0);
    }
}
