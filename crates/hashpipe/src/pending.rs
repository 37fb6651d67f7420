use portable_atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counts records that were admitted but not yet persisted.
///
/// The publisher increments the counter for every admitted record and a
/// worker decrements it exactly once when it is done with that record, whether
/// or not the write succeeded. [`PendingWork::wait_drained`] lets a shutdown
/// path block until the count reaches zero.
///
/// A `PendingWork` is owned by one pipeline and shared by handle (usually an
/// `Arc`); there is no process-wide instance.
#[derive(Debug, Default)]
pub struct PendingWork {
    count: AtomicUsize,
    drained: Notify,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current number of admitted-but-unfinished records.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Records one more admitted item.
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Records that one admitted item is finished, waking drain waiters when
    /// the count reaches zero.
    pub fn decrement(&self) {
        let previous = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "pending counter decremented below zero");
        if previous == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Waits until the count is zero.
    ///
    /// Returns immediately if nothing is pending. New increments after this
    /// returns are not waited for.
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a decrement between the check and
            // the await is not missed.
            notified.as_mut().enable();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}
