use crate::{PendingWork, QueueReceiver, Record, RecordStore};
use core::time::Duration;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Worker task responsible for persisting queued [`Record`]s.
///
/// Each iteration waits for the next record, sleeps for `delay` to model
/// persistence latency, writes the record into `store`, and then marks it as
/// finished in `pending`. The pending counter is decremented exactly once per
/// record even if the write fails; failures are logged and the record is
/// dropped.
///
/// This function is designed to be spawned as a Tokio task. It runs until
/// `shutdown` is cancelled or the queue is closed and empty. Cancellation is
/// only observed between records, never during a delay.
///
/// # Arguments
///
/// - `worker_id`: Numeric identifier for this worker (used for logs/tracing).
/// - `receiver`: Shared consuming end of the admission queue.
/// - `store`: Destination for persisted records.
/// - `delay`: Fixed processing delay applied to every record.
/// - `pending`: Counter decremented once per finished record.
/// - `shutdown`: Stops the loop when cancelled.
pub async fn worker_loop<S>(
    worker_id: usize,
    receiver: QueueReceiver,
    store: S,
    delay: Duration,
    pending: Arc<PendingWork>,
    shutdown: CancellationToken,
) where
    S: RecordStore,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} started");

    loop {
        let record = tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            next = receiver.recv() => match next {
                Some(record) => record,
                None => break,
            },
        };

        let _finished = Finished(&pending);
        persist_record(worker_id, record, &store, delay).await;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {worker_id} stopped");
}

/// Sleeps for `delay`, then writes `record` into `store`.
#[allow(clippy::used_underscore_binding)]
async fn persist_record<S: RecordStore>(
    _worker_id: usize,
    record: Record,
    store: &S,
    delay: Duration,
) {
    let _id = record.id();
    let _start = std::time::Instant::now();

    #[cfg(feature = "tracing")]
    tracing::debug!("Worker {_worker_id} received item.id={_id}");

    tokio::time::sleep(delay).await;

    match store.put(record) {
        Ok(_) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Worker {_worker_id} stored item.id={_id} in {} ms",
                _start.elapsed().as_millis()
            );
        }
        Err(_e) => {
            // The caller already got its id back; the record is lost.
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Worker {_worker_id} failed to store item.id={_id} in {} ms: {_e}",
                _start.elapsed().as_millis()
            );
        }
    }
}

/// Decrements the pending counter on drop, including during a panic.
struct Finished<'a>(&'a PendingWork);

impl Drop for Finished<'_> {
    fn drop(&mut self) {
        self.0.decrement();
    }
}
