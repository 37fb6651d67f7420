//! The composed, in-process pipeline.
//!
//! [`Pipeline`] wires every component together for one instance:
//!
//! - an [`AtomicIdAllocator`] for ids,
//! - a [`bounded`] queue whose [`QueuePublisher`] admits records,
//! - a [`WorkerPool`] that delays and persists them into a [`MemoryStore`],
//! - a [`PendingWork`] counter used to drain on shutdown.
//!
//! All state is owned by the instance, so several pipelines can run side by
//! side in one process.
//!
//! ## Shutdown
//!
//! [`Pipeline::shutdown`] refuses further admissions, waits for every admitted
//! record to be persisted (in-flight delays are waited out, not cancelled),
//! and then stops the workers.

use crate::{
    AtomicIdAllocator, DefaultHashingService, Error, HashingService, MemoryStore, PendingWork,
    PipelineConfig, QueuePublisher, Record, Result, WorkerPool, bounded,
};
use parking_lot::RwLock;
use std::sync::Arc;

type LocalService = DefaultHashingService<QueuePublisher, Arc<MemoryStore>, AtomicIdAllocator>;

/// An in-memory hashing pipeline backed by a Tokio worker pool.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    service: LocalService,
    store: Arc<MemoryStore>,
    pending: Arc<PendingWork>,
    worker_pool: WorkerPool,
    // Creates hold the read side across check-and-publish, so nothing is
    // admitted once shutdown has flipped this.
    accepting: RwLock<bool>,
}

impl Pipeline {
    /// Validates `config` and spawns the worker pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration is rejected by
    /// [`PipelineConfig::validate`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;

        let pending = Arc::new(PendingWork::new());
        let store = Arc::new(MemoryStore::new());
        let (publisher, receiver) = bounded(config.queue_capacity, Arc::clone(&pending));
        let worker_pool = WorkerPool::spawn(
            config.num_workers,
            &receiver,
            &store,
            config.processing_delay,
            &pending,
        );
        let service =
            DefaultHashingService::new(publisher, Arc::clone(&store), AtomicIdAllocator::new());

        Ok(Self {
            config,
            service,
            store,
            pending,
            worker_pool,
            accepting: RwLock::new(true),
        })
    }

    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Number of admitted records not yet persisted.
    pub fn pending(&self) -> usize {
        self.pending.count()
    }

    /// Number of persisted records.
    pub fn stored(&self) -> usize {
        self.store.len()
    }

    /// Whether [`Self::shutdown`] has been called.
    pub fn is_closing(&self) -> bool {
        !*self.accepting.read()
    }

    /// Waits until every record admitted so far has been persisted.
    ///
    /// Admissions are not refused while waiting; use [`Self::shutdown`] for
    /// that.
    pub async fn drain(&self) {
        self.pending.wait_drained().await;
    }

    /// Gracefully shuts the pipeline down.
    ///
    /// 1. Refuse new admissions ([`Error::ShuttingDown`]).
    /// 2. Wait for the pending counter to reach zero.
    /// 3. Stop the worker pool.
    ///
    /// Lookups keep working afterwards.
    pub async fn shutdown(&self) {
        #[cfg(feature = "tracing")]
        tracing::info!("Refusing new admissions");
        *self.accepting.write() = false;

        #[cfg(feature = "tracing")]
        tracing::info!("Draining pending items ({} pending)", self.pending());
        self.drain().await;

        self.worker_pool.stop().await;

        #[cfg(feature = "tracing")]
        tracing::info!("Pipeline shutdown complete ({} items stored)", self.stored());
    }
}

impl HashingService for Pipeline {
    fn create(&self, value: &str) -> Result<Record> {
        let accepting = self.accepting.read();
        if !*accepting {
            return Err(Error::ShuttingDown);
        }
        self.service.create(value)
    }

    fn get(&self, id: u64) -> Result<Record> {
        self.service.get(id)
    }
}

#[cfg(test)]
mod tests;
