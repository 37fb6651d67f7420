use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A minimal interface for allocating record identifiers.
pub trait IdAllocator {
    /// Returns the next identifier. Every call returns a value never returned
    /// before by this allocator.
    fn next_id(&self) -> u64;
}

/// A lock-free identifier allocator suitable for multi-threaded environments.
///
/// Identifiers form the sequence `0, 1, 2, ...` in allocation order. The state
/// is a single [`AtomicU64`], so concurrent callers never block each other and
/// never observe the same value.
///
/// ## Caveats
/// There is no overflow check: after `u64::MAX` allocations the counter wraps.
///
/// # Example
/// ```
/// use hashpipe::{AtomicIdAllocator, IdAllocator};
///
/// let allocator = AtomicIdAllocator::new();
/// assert_eq!(allocator.next_id(), 0);
/// assert_eq!(allocator.next_id(), 1);
/// ```
#[derive(Debug, Default)]
pub struct AtomicIdAllocator {
    next: AtomicU64,
}

impl AtomicIdAllocator {
    /// Creates an allocator whose first identifier is `0`.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates an allocator whose first identifier is `first`.
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Returns the identifier the next call to [`IdAllocator::next_id`] will
    /// hand out.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl IdAllocator for AtomicIdAllocator {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn next_id(&self) -> u64 {
        // Only uniqueness matters here; the value does not publish any other
        // memory.
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl<T: IdAllocator + ?Sized> IdAllocator for std::sync::Arc<T> {
    fn next_id(&self) -> u64 {
        (**self).next_id()
    }
}
