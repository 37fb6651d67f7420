use super::*;
use crate::{MAX_VALUE_LEN, digest};
use core::time::Duration;
use std::collections::HashSet;
use tokio::time::{sleep, timeout};

const DELAY: Duration = Duration::from_secs(5);

fn pipeline(queue_capacity: usize, num_workers: usize, delay: Duration) -> Pipeline {
    Pipeline::new(PipelineConfig::new(queue_capacity, num_workers, delay)).unwrap()
}

#[tokio::test]
async fn rejects_invalid_config() {
    let err = Pipeline::new(PipelineConfig::new(0, 1, DELAY)).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test(start_paused = true)]
async fn record_is_visible_after_the_delay() {
    let pipeline = pipeline(10, 1, DELAY);

    let record = pipeline.create("hello").unwrap();
    assert_eq!(record.id(), 0);
    assert_eq!(record.digest(), digest("hello"));
    assert_eq!(pipeline.get(0), Err(Error::NotFound { id: 0 }));
    assert_eq!(pipeline.pending(), 1);

    sleep(DELAY + Duration::from_millis(100)).await;

    assert_eq!(pipeline.get(0).map(Record::into_digest), Ok(digest("hello")));
    assert_eq!(pipeline.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_id_is_not_found() {
    let pipeline = pipeline(10, 1, Duration::ZERO);
    pipeline.create("x").unwrap();
    pipeline.drain().await;

    assert!(pipeline.get(0).is_ok());
    assert_eq!(pipeline.get(1), Err(Error::NotFound { id: 1 }));
    assert_eq!(pipeline.get(u64::MAX), Err(Error::NotFound { id: u64::MAX }));
}

#[tokio::test(start_paused = true)]
async fn validation_boundaries() {
    let pipeline = pipeline(10, 1, Duration::ZERO);

    assert_eq!(pipeline.create(""), Err(Error::InvalidLength { length: 0 }));
    assert!(pipeline.create(&"a".repeat(MAX_VALUE_LEN)).is_ok());
    assert_eq!(
        pipeline.create(&"a".repeat(MAX_VALUE_LEN + 1)),
        Err(Error::InvalidLength { length: 65 })
    );
    // Validation failures do not consume ids.
    assert_eq!(pipeline.create("b").map(|r| r.id()), Ok(1));
}

#[tokio::test(start_paused = true)]
async fn full_queue_rejects_until_a_worker_takes_an_entry() {
    let pipeline = pipeline(2, 1, DELAY);

    // The worker has not run yet, so both entries sit in the queue.
    assert!(pipeline.create("a").is_ok());
    assert!(pipeline.create("b").is_ok());
    assert_eq!(pipeline.create("c"), Err(Error::AdmissionRejected));

    // Let the worker pull "a" and start its delay.
    sleep(Duration::from_millis(1)).await;

    let record = pipeline.create("d").unwrap();
    // "c" consumed id 2 even though it was rejected.
    assert_eq!(record.id(), 3);
    assert_eq!(pipeline.create("e"), Err(Error::AdmissionRejected));

    pipeline.shutdown().await;
    assert_eq!(pipeline.stored(), 3);
    assert_eq!(pipeline.get(2), Err(Error::NotFound { id: 2 }));
}

#[tokio::test(start_paused = true)]
async fn shutdown_drains_every_admitted_record() {
    const ITEMS: u64 = 50;
    let pipeline = pipeline(ITEMS as usize, 4, DELAY);

    let records: Vec<_> = (0..ITEMS)
        .map(|i| pipeline.create(&format!("value-{i}")).unwrap())
        .collect();
    assert_eq!(pipeline.pending(), ITEMS as usize);

    pipeline.shutdown().await;

    assert_eq!(pipeline.pending(), 0);
    for record in records {
        assert_eq!(pipeline.get(record.id()), Ok(record));
    }
}

#[tokio::test(start_paused = true)]
async fn shutdown_refuses_new_admissions_but_serves_lookups() {
    let pipeline = pipeline(4, 1, Duration::from_millis(10));
    pipeline.create("kept").unwrap();

    pipeline.shutdown().await;

    assert!(pipeline.is_closing());
    assert_eq!(pipeline.create("late"), Err(Error::ShuttingDown));
    assert_eq!(pipeline.get(0).map(|r| r.id()), Ok(0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_creates_get_distinct_dense_ids() {
    const TASKS: usize = 16;
    const PER_TASK: usize = 250;

    let pipeline = Arc::new(pipeline(TASKS * PER_TASK, 32, Duration::ZERO));
    let tasks: Vec<_> = (0..TASKS)
        .map(|t| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                (0..PER_TASK)
                    .map(|i| pipeline.create(&format!("{t}-{i}")).unwrap().id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: HashSet<u64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .flat_map(|ids| ids.unwrap())
        .collect();

    let total = (TASKS * PER_TASK) as u64;
    assert_eq!(ids.len() as u64, total);
    assert!((0..total).all(|id| ids.contains(&id)));

    timeout(Duration::from_secs(10), pipeline.shutdown())
        .await
        .expect("pipeline should drain");
    assert_eq!(pipeline.stored() as u64, total);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn creates_racing_shutdown_are_either_refused_or_persisted() {
    const CREATORS: usize = 8;

    for _ in 0..20 {
        let pipeline = Arc::new(pipeline(100_000, 4, Duration::ZERO));
        let creators: Vec<_> = (0..CREATORS)
            .map(|t| {
                let pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move {
                    let mut admitted = Vec::new();
                    for i in 0.. {
                        match pipeline.create(&format!("{t}-{i}")) {
                            Ok(record) => admitted.push(record),
                            Err(Error::ShuttingDown) => break,
                            Err(e) => panic!("unexpected error: {e}"),
                        }
                        tokio::task::yield_now().await;
                    }
                    admitted
                })
            })
            .collect();

        tokio::task::yield_now().await;
        timeout(Duration::from_secs(10), pipeline.shutdown())
            .await
            .expect("pipeline should drain");

        let admitted: Vec<Record> = futures::future::join_all(creators)
            .await
            .into_iter()
            .flat_map(|records| records.unwrap())
            .collect();

        assert_eq!(pipeline.pending(), 0);
        assert_eq!(pipeline.stored(), admitted.len());
        for record in admitted {
            assert_eq!(pipeline.get(record.id()), Ok(record));
        }
    }
}

#[tokio::test(start_paused = true)]
async fn same_value_same_digest() {
    let pipeline = pipeline(4, 1, Duration::ZERO);
    let a = pipeline.create("repeat").unwrap();
    let b = pipeline.create("repeat").unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.digest(), b.digest());
}

#[tokio::test(start_paused = true)]
async fn pipelines_do_not_share_state() {
    let first = pipeline(4, 1, Duration::ZERO);
    let second = pipeline(4, 1, Duration::ZERO);

    assert_eq!(first.create("a").map(|r| r.id()), Ok(0));
    assert_eq!(second.create("b").map(|r| r.id()), Ok(0));

    first.shutdown().await;
    assert!(second.create("c").is_ok());
    second.drain().await;

    assert_eq!(first.get(0).map(|r| r.digest().to_owned()), Ok(digest("a")));
    assert_eq!(second.get(0).map(|r| r.digest().to_owned()), Ok(digest("b")));
    assert_eq!(second.stored(), 2);
}
