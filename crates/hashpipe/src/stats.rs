//! Running-average statistics over instrumented calls.
//!
//! [`Stats`] counts how many operations were wrapped and keeps the mean
//! elapsed time of those operations in microseconds. The mean is folded in
//! incrementally as each call completes:
//!
//! ```text
//! average' = (total * average + elapsed) / (total + 1)
//! total'   = total + 1
//! ```
//!
//! using truncating integer division.

use crate::time::{MonotonicClock, TimeSource};
use parking_lot::RwLock;

/// A point-in-time copy of the aggregated statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    /// Number of wrapped calls so far.
    pub total: u64,
    /// Mean elapsed time per call, in microseconds.
    pub average: u64,
}

impl StatsSnapshot {
    /// Returns the snapshot after folding in one more call that took
    /// `elapsed_micros`.
    #[must_use]
    pub fn fold(self, elapsed_micros: u64) -> Self {
        let total = self.total + 1;
        let sum = u128::from(self.total) * u128::from(self.average) + u128::from(elapsed_micros);
        // The quotient is bounded by max(average, elapsed), so it fits.
        let average = (sum / u128::from(total)) as u64;
        Self { total, average }
    }
}

/// Thread-safe call counter and running-average timer.
///
/// The wrapped operation runs while the exclusive lock is held, so every
/// instrumented call is serialized. Do not wrap long-blocking work.
///
/// # Example
/// ```
/// use hashpipe::Stats;
///
/// let stats = Stats::new();
/// let answer = stats.wrap(|| 6 * 7);
/// assert_eq!(answer, 42);
/// assert_eq!(stats.snapshot().total, 1);
/// ```
#[derive(Debug)]
pub struct Stats<T = MonotonicClock> {
    state: RwLock<StatsSnapshot>,
    time: T,
}

impl Stats<MonotonicClock> {
    /// Creates an empty aggregator measuring with a [`MonotonicClock`].
    pub fn new() -> Self {
        Self::with_time(MonotonicClock::new())
    }
}

impl Default for Stats<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> Stats<T> {
    /// Creates an empty aggregator measuring with the given [`TimeSource`].
    pub fn with_time(time: T) -> Self {
        Self {
            state: RwLock::new(StatsSnapshot {
                total: 0,
                average: 0,
            }),
            time,
        }
    }

    /// Runs `op`, folding its elapsed time into the running average.
    ///
    /// The clock starts before the lock is taken, so time spent waiting for
    /// other instrumented calls is included in the measurement.
    pub fn wrap<R>(&self, op: impl FnOnce() -> R) -> R {
        let start = self.time.current_micros();
        let mut state = self.state.write();
        let result = op();
        let elapsed = self.time.current_micros().saturating_sub(start);
        *state = state.fold(elapsed);
        result
    }

    /// Returns the current totals.
    pub fn snapshot(&self) -> StatsSnapshot {
        *self.state.read()
    }
}
