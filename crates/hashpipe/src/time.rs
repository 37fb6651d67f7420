use std::time::Instant;

/// A trait for time sources used to measure elapsed time.
///
/// This abstraction allows you to plug in a real monotonic timer or a mocked
/// time source in tests.
///
/// The unit is **microseconds** relative to an origin chosen by the
/// implementation. Only differences between two readings are meaningful.
///
/// # Example
///
/// ```
/// use hashpipe::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_micros(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_micros(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in microseconds since the source's origin.
    fn current_micros(&self) -> u64;
}

/// A monotonic time source measuring microseconds since its construction.
///
/// Backed by [`Instant`], so readings never go backwards and are unaffected by
/// wall-clock adjustments.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    fn current_micros(&self) -> u64 {
        // Saturates instead of wrapping.
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}
