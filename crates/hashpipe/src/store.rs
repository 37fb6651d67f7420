use crate::{Error, Record, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Keyed storage for persisted [`Record`]s.
///
/// Implementations must be safe to share between the worker pool (writers)
/// and request handlers (readers).
pub trait RecordStore {
    /// Inserts `record` unless its id is already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if a record with the same id exists.
    fn put(&self, record: Record) -> Result<Record>;

    /// Returns the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing is stored under `id`.
    fn get(&self, id: u64) -> Result<Record>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn put(&self, record: Record) -> Result<Record> {
        (**self).put(record)
    }

    fn get(&self, id: u64) -> Result<Record> {
        (**self).get(id)
    }
}

/// An in-memory [`RecordStore`] guarded by a single read-write lock.
///
/// Lookups share the lock; inserts take it exclusively. Entries live for the
/// lifetime of the store and are never evicted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<u64, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl RecordStore for MemoryStore {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all, fields(id = record.id())))]
    fn put(&self, record: Record) -> Result<Record> {
        use std::collections::hash_map::Entry;

        let mut items = self.items.write();
        match items.entry(record.id()) {
            Entry::Occupied(_) => Err(Error::Conflict { id: record.id() }),
            Entry::Vacant(slot) => Ok(slot.insert(record).clone()),
        }
    }

    fn get(&self, id: u64) -> Result<Record> {
        self.items
            .read()
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound { id })
    }
}
