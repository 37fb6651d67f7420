//! Create/Get orchestration.
//!
//! [`DefaultHashingService`] is the composition point for the pipeline's
//! collaborators. Its [`Publisher`], [`RecordStore`] and [`IdAllocator`] are
//! injected at construction, so each can be replaced independently.

use crate::{
    Error, IdAllocator, MAX_VALUE_LEN, MIN_VALUE_LEN, Publisher, Record, RecordStore, Result,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// The two operations a transport layer calls into.
pub trait HashingService {
    /// Validates `value`, assigns it an id, computes its digest and admits it
    /// for asynchronous persistence.
    ///
    /// The returned record is available to the caller immediately; it becomes
    /// visible through [`Self::get`] only after a worker has stored it.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] if `value` is empty or longer than
    ///   [`MAX_VALUE_LEN`] bytes.
    /// - [`Error::AdmissionRejected`] if the queue is full.
    fn create(&self, value: &str) -> Result<Record>;

    /// Returns the persisted record for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record is stored under `id`,
    /// including ids that are admitted but not yet persisted.
    fn get(&self, id: u64) -> Result<Record>;
}

impl<H: HashingService + ?Sized> HashingService for std::sync::Arc<H> {
    fn create(&self, value: &str) -> Result<Record> {
        (**self).create(value)
    }

    fn get(&self, id: u64) -> Result<Record> {
        (**self).get(id)
    }
}

/// Checks that `value` has an accepted length in bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] when the check fails.
pub fn validate_value(value: &str) -> Result<()> {
    let length = value.len();
    if length < MIN_VALUE_LEN || length > MAX_VALUE_LEN {
        return Err(Error::InvalidLength { length });
    }
    Ok(())
}

/// [`HashingService`] built from injected collaborators.
#[derive(Debug)]
pub struct DefaultHashingService<P, S, A> {
    publisher: P,
    store: S,
    allocator: A,
}

impl<P, S, A> DefaultHashingService<P, S, A>
where
    P: Publisher,
    S: RecordStore,
    A: IdAllocator,
{
    pub const fn new(publisher: P, store: S, allocator: A) -> Self {
        Self {
            publisher,
            store,
            allocator,
        }
    }
}

impl<P, S, A> HashingService for DefaultHashingService<P, S, A>
where
    P: Publisher,
    S: RecordStore,
    A: IdAllocator,
{
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(len = value.len())))]
    fn create(&self, value: &str) -> Result<Record> {
        validate_value(value)?;
        // An id is consumed even if admission fails below.
        let id = self.allocator.next_id();
        let record = Record::new(id, value);
        self.publisher.publish(record.clone())?;
        Ok(record)
    }

    fn get(&self, id: u64) -> Result<Record> {
        self.store.get(id)
    }
}

#[cfg(test)]
mod tests;
