//! Fixed-size pool of persistence workers.
//!
//! [`WorkerPool`] spawns `num_workers` copies of [`worker_loop`] that compete
//! for entries on one shared [`QueueReceiver`]. The pool does not grow or
//! shrink. It is stopped through a shared [`CancellationToken`], which the
//! owner only cancels once all admitted work has drained: closing the queue
//! instead would strand records that are still buffered.

use super::worker::worker_loop;
use crate::{PendingWork, QueueReceiver, RecordStore};
use core::time::Duration;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{task::JoinHandle, time::timeout};
use tokio_util::sync::CancellationToken;

/// How long [`WorkerPool::stop`] waits for each worker to exit.
pub const WORKER_STOP_TIMEOUT: Duration = Duration::from_secs(3);

/// A cooperative pool of asynchronous workers draining one queue.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Mutex<Vec<JoinHandle<()>>>,
    shutdown_token: CancellationToken,
    size: usize,
}

impl WorkerPool {
    /// Spawns `num_workers` workers on the current Tokio runtime.
    ///
    /// Every worker receives a clone of `store` and applies `delay` to each
    /// record before writing it.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn spawn<S>(
        num_workers: usize,
        receiver: &QueueReceiver,
        store: &S,
        delay: Duration,
        pending: &Arc<PendingWork>,
    ) -> Self
    where
        S: RecordStore + Clone + Send + Sync + 'static,
    {
        let shutdown_token = CancellationToken::new();
        let handles = (0..num_workers)
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    receiver.clone(),
                    store.clone(),
                    delay,
                    Arc::clone(pending),
                    shutdown_token.clone(),
                ))
            })
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!("Spawned {num_workers} workers with a {delay:?} processing delay");

        Self {
            handles: Mutex::new(handles),
            shutdown_token,
            size: num_workers,
        }
    }

    /// Number of workers the pool was started with.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether [`Self::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }

    /// Stops all workers.
    ///
    /// - Cancels the shared [`CancellationToken`]; idle workers exit at once.
    /// - A worker in the middle of a record finishes it first.
    /// - Waits up to [`WORKER_STOP_TIMEOUT`] per worker for it to exit.
    ///
    /// Records still buffered in the queue are not processed, so callers
    /// should wait for the pending counter to drain before stopping. Calling
    /// this more than once is a no-op.
    pub async fn stop(&self) {
        self.shutdown_token.cancel();
        let handles = core::mem::take(&mut *self.handles.lock());

        #[cfg(feature = "tracing")]
        tracing::debug!("Waiting for {} workers to stop", handles.len());

        let waits = handles
            .into_iter()
            .enumerate()
            .map(|(_i, handle)| async move {
                match timeout(WORKER_STOP_TIMEOUT, handle).await {
                    Ok(Ok(())) => {
                        #[cfg(feature = "tracing")]
                        tracing::trace!("Worker {_i} stopped");
                    }
                    Ok(Err(_e)) => {
                        #[cfg(feature = "tracing")]
                        tracing::error!("Worker {_i} failed: {_e}");
                    }
                    Err(_) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("Worker {_i} stop timed out");
                    }
                }
            });

        futures::future::join_all(waits).await;

        #[cfg(feature = "tracing")]
        tracing::info!("Worker pool stopped");
    }
}
