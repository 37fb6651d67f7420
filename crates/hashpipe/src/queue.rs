//! Bounded admission queue.
//!
//! [`bounded`] creates a fixed-capacity FIFO channel and returns both ends:
//!
//! - [`QueuePublisher`] makes a single, non-blocking admission attempt per
//!   record and fails fast with [`Error::AdmissionRejected`] when the queue is
//!   full. It never waits for space.
//! - [`QueueReceiver`] is shared by every worker. Each entry is handed to
//!   exactly one of them (competing consumers), in admission order.

use crate::{Error, PendingWork, Record, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Hands records to the asynchronous persistence side.
pub trait Publisher {
    /// Attempts to admit `record` for asynchronous processing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdmissionRejected`] if the record was not admitted.
    fn publish(&self, record: Record) -> Result<()>;
}

impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    fn publish(&self, record: Record) -> Result<()> {
        (**self).publish(record)
    }
}

/// Creates a queue holding at most `capacity` records.
///
/// Every record admitted through the returned publisher is counted in
/// `pending` before [`Publisher::publish`] returns.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn bounded(capacity: usize, pending: Arc<PendingWork>) -> (QueuePublisher, QueueReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        QueuePublisher { tx, pending },
        QueueReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// The admitting end of a [`bounded`] queue.
#[derive(Debug, Clone)]
pub struct QueuePublisher {
    tx: mpsc::Sender<Record>,
    pending: Arc<PendingWork>,
}

impl QueuePublisher {
    /// Number of records that can currently be admitted.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

impl Publisher for QueuePublisher {
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(id = record.id())))]
    fn publish(&self, record: Record) -> Result<()> {
        // Counted up front: once the record is in the channel a worker may
        // finish it (and decrement) before `try_send` returns.
        self.pending.increment();
        match self.tx.try_send(record) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Publisher published record");
                Ok(())
            }
            Err(_e) => {
                self.pending.decrement();
                #[cfg(feature = "tracing")]
                tracing::debug!("Publisher failed to publish record: {_e}");
                Err(Error::AdmissionRejected)
            }
        }
    }
}

/// The consuming end of a [`bounded`] queue, shared by all workers.
#[derive(Debug, Clone)]
pub struct QueueReceiver {
    rx: Arc<Mutex<mpsc::Receiver<Record>>>,
}

impl QueueReceiver {
    /// Waits for the next record.
    ///
    /// Only one worker waits on the channel at a time; the rest wait for the
    /// lock. Returns `None` once every publisher is dropped and the queue is
    /// empty.
    pub async fn recv(&self) -> Option<Record> {
        self.rx.lock().await.recv().await
    }
}
