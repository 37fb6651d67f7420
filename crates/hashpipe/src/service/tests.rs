use super::*;
use crate::{AtomicIdAllocator, digest};
use parking_lot::Mutex;

type PublishFn = Box<dyn Fn(&Record) -> Result<()> + Send + Sync>;
type GetFn = Box<dyn Fn(u64) -> Result<Record> + Send + Sync>;

/// Publisher stub that remembers every record and answers with `handler`.
struct MockPublisher {
    handler: PublishFn,
    published: Mutex<Vec<Record>>,
}

impl MockPublisher {
    fn new(handler: impl Fn(&Record) -> Result<()> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            published: Mutex::new(Vec::new()),
        }
    }

    fn accepting() -> Self {
        Self::new(|_| Ok(()))
    }
}

impl Publisher for MockPublisher {
    fn publish(&self, record: Record) -> Result<()> {
        let result = (self.handler)(&record);
        self.published.lock().push(record);
        result
    }
}

/// Store stub answering lookups with `get`; puts are never expected here.
struct MockStore {
    get: GetFn,
}

impl MockStore {
    fn new(get: impl Fn(u64) -> Result<Record> + Send + Sync + 'static) -> Self {
        Self { get: Box::new(get) }
    }

    fn empty() -> Self {
        Self::new(|id| Err(Error::NotFound { id }))
    }
}

impl RecordStore for MockStore {
    fn put(&self, record: Record) -> Result<Record> {
        panic!("unexpected put of item.id={}", record.id())
    }

    fn get(&self, id: u64) -> Result<Record> {
        (self.get)(id)
    }
}

#[test]
fn get_delegates_to_the_store() {
    let item = Record::new(1, "test");
    let expected = item.clone();
    let service = DefaultHashingService::new(
        MockPublisher::accepting(),
        MockStore::new(move |_| Ok(item.clone())),
        AtomicIdAllocator::new(),
    );

    assert_eq!(service.get(1), Ok(expected));
}

#[test]
fn get_propagates_store_errors_unchanged() {
    let service = DefaultHashingService::new(
        MockPublisher::accepting(),
        MockStore::empty(),
        AtomicIdAllocator::new(),
    );

    let err = service.get(1).unwrap_err();
    assert_eq!(err, Error::NotFound { id: 1 });
    assert_eq!(err.to_string(), "Item with id 1 does not exist");
}

#[test]
fn create_publishes_the_returned_record() {
    let service = DefaultHashingService::new(
        MockPublisher::accepting(),
        MockStore::empty(),
        AtomicIdAllocator::new(),
    );

    let record = service.create("test").unwrap();
    assert_eq!(record, Record::new(0, "test"));
    assert_eq!(record.digest(), digest("test"));

    let published = service.publisher.published.lock();
    assert_eq!(*published, vec![record]);
}

#[test]
fn create_assigns_sequential_ids() {
    let service = DefaultHashingService::new(
        MockPublisher::accepting(),
        MockStore::empty(),
        AtomicIdAllocator::new(),
    );

    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|v| service.create(v).unwrap().id())
        .collect();
    assert_eq!(ids, vec![0, 1, 2]);
}

#[test]
fn create_rejects_empty_value() {
    let service = DefaultHashingService::new(
        MockPublisher::accepting(),
        MockStore::empty(),
        AtomicIdAllocator::new(),
    );

    assert_eq!(service.create(""), Err(Error::InvalidLength { length: 0 }));
    assert!(service.publisher.published.lock().is_empty());
}

#[test]
fn create_accepts_exactly_max_len() {
    let service = DefaultHashingService::new(
        MockPublisher::accepting(),
        MockStore::empty(),
        AtomicIdAllocator::new(),
    );

    let value = "a".repeat(MAX_VALUE_LEN);
    assert!(service.create(&value).is_ok());
}

#[test]
fn create_rejects_one_past_max_len() {
    let service = DefaultHashingService::new(
        MockPublisher::accepting(),
        MockStore::empty(),
        AtomicIdAllocator::new(),
    );

    let value = "a".repeat(MAX_VALUE_LEN + 1);
    let err = service.create(&value).unwrap_err();
    assert_eq!(err, Error::InvalidLength { length: 65 });
    assert_eq!(
        err.to_string(),
        "Unsupported input length: 65. Must be at least 1 and no more than 64."
    );
}

#[test]
fn length_is_measured_in_bytes() {
    // 22 four-byte characters: 88 bytes.
    let value = "🦀".repeat(22);
    assert_eq!(validate_value(&value), Err(Error::InvalidLength { length: 88 }));
    assert_eq!(validate_value(&"🦀".repeat(16)), Ok(()));
}

#[test]
fn rejected_admission_is_returned_and_consumes_the_id() {
    let service = DefaultHashingService::new(
        MockPublisher::new(|record| {
            if record.id() == 0 {
                Err(Error::AdmissionRejected)
            } else {
                Ok(())
            }
        }),
        MockStore::empty(),
        AtomicIdAllocator::new(),
    );

    assert_eq!(service.create("first"), Err(Error::AdmissionRejected));
    assert_eq!(service.create("second").map(|r| r.id()), Ok(1));
}
