use geobucket_core::{BucketStore, GeoBuckets};
use std::collections::HashSet;
use std::thread;

const WRITERS: usize = 8;

#[test]
fn concurrent_assigns_to_one_cell_create_one_bucket() {
    let db = GeoBuckets::in_memory();

    let ids: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let db = &db;
                s.spawn(move || db.assign(6.4302, 3.4216, &format!("Victoria Island {i}")).unwrap().id)
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 1);
    assert_eq!(db.store().bucket_count().unwrap(), 1);

    let bucket = db.store().find_by_id(ids[0]).unwrap().unwrap();
    assert_eq!(bucket.variant_names.len(), WRITERS);
    assert_eq!(db.store().entry_count(), WRITERS);
}

#[test]
fn concurrent_attach_loses_no_updates() {
    let db = GeoBuckets::in_memory();
    let bucket = db.assign(6.6018, 3.3569, "Ikeja").unwrap();
    const PER_THREAD: u64 = 250;

    thread::scope(|s| {
        for _ in 0..WRITERS {
            let db = &db;
            s.spawn(move || {
                for _ in 0..PER_THREAD {
                    db.attach_member(bucket.id).unwrap();
                }
            });
        }
    });

    let stored = db.store().find_by_id(bucket.id).unwrap().unwrap();
    assert_eq!(stored.member_count, WRITERS as u64 * PER_THREAD);
}

#[test]
fn readers_run_alongside_writers() {
    let db = GeoBuckets::in_memory();
    db.assign(6.4667, 3.5833, "Ajah").unwrap();

    thread::scope(|s| {
        let writer = {
            let db = &db;
            s.spawn(move || {
                for i in 0..50 {
                    let lat = 6.40 + i as f64 * 0.01;
                    db.assign(lat, 3.40, &format!("Estate {i}")).unwrap();
                }
            })
        };
        for _ in 0..4 {
            let db = &db;
            s.spawn(move || {
                for _ in 0..50 {
                    let hits = db.search("ajah", None).unwrap();
                    assert!(!hits.is_empty());
                }
            });
        }
        writer.join().unwrap();
    });

    assert_eq!(db.store().bucket_count().unwrap(), 51);
}
