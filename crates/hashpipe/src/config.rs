use crate::{Error, Result};
use core::time::Duration;

/// Shortest accepted input value, in bytes.
pub const MIN_VALUE_LEN: usize = 1;

/// Longest accepted input value, in bytes.
pub const MAX_VALUE_LEN: usize = 64;

/// Construction parameters for a [`Pipeline`](crate::Pipeline).
///
/// These settings control how much work can be buffered, how many workers
/// drain it, and how long each record takes to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum number of admitted records waiting for a worker. When the
    /// queue is full, new records are rejected rather than queued.
    pub queue_capacity: usize,

    /// Number of worker tasks draining the queue concurrently.
    pub num_workers: usize,

    /// Time each worker spends on a record before writing it to the store.
    pub processing_delay: Duration,
}

impl PipelineConfig {
    pub const fn new(queue_capacity: usize, num_workers: usize, processing_delay: Duration) -> Self {
        Self {
            queue_capacity,
            num_workers,
            processing_delay,
        }
    }

    /// Checks that the configuration can be used to start a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `queue_capacity` or `num_workers`
    /// is zero.
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "queue_capacity must be greater than 0".to_string(),
            });
        }

        if self.num_workers == 0 {
            return Err(Error::InvalidConfig {
                reason: "num_workers must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    /// 100,000 queued records, 1,000 workers and a five second delay.
    fn default() -> Self {
        Self::new(100_000, 1_000, Duration::from_secs(5))
    }
}
