//! Debounced, cancellable background jobs for search-as-you-type.
//!
//! Each call to [`Debouncer::schedule`] aborts the job still waiting out its
//! delay and bumps a generation counter. A job that finishes after a newer one
//! was scheduled publishes nothing, so a slow response to an old query can
//! never overwrite the results of a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// Delay applied to interactive search input.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A job's output tagged with the generation that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<T> {
    pub generation: u64,
    pub value: T,
}

pub struct Debouncer<T> {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    latest: Arc<watch::Sender<Option<Settled<T>>>>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(delay: Duration) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            latest: Arc::new(latest),
        }
    }

    /// Receives every result that was still current when it finished.
    pub fn subscribe(&self) -> watch::Receiver<Option<Settled<T>>> {
        self.latest.subscribe()
    }

    pub fn latest(&self) -> Option<Settled<T>> {
        self.latest.borrow().clone()
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Replaces any pending job with `job`, started after the delay.
    pub fn schedule<F, Fut>(&self, job: F) -> u64
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.spawn(job, None)
    }

    /// Schedules `job` and waits for it. `None` when a newer call superseded it.
    pub async fn run<F, Fut>(&self, job: F) -> Option<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.spawn(job, Some(tx));
        rx.await.ok()
    }

    /// Drops the pending job, if any, and invalidates in-flight results.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }

    fn spawn<F, Fut>(&self, job: F, reply: Option<oneshot::Sender<T>>) -> u64
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let delay = self.delay;
        let current = Arc::clone(&self.generation);
        let latest = Arc::clone(&self.latest);
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let value = job().await;

            if current.load(Ordering::SeqCst) != generation {
                debug!(generation, "Discarding superseded result");
                return;
            }
            latest.send_if_modified(|slot| {
                if slot.as_ref().is_some_and(|s| s.generation > generation) {
                    return false;
                }
                *slot = Some(Settled {
                    generation,
                    value: value.clone(),
                });
                true
            });
            if let Some(reply) = reply {
                let _ = reply.send(value);
            }
        }));
        generation
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}
