//! Several workers filing listings into one shared store.
//!
//! Run with:
//!     cargo run --example concurrent_ingest
use geobucket_core::{BucketStore, GeoBuckets};
use std::thread;

const WORKERS: usize = 8;
const LISTINGS_PER_WORKER: usize = 500;

fn main() -> geobucket_core::Result<()> {
    env_logger::init();
    let db = GeoBuckets::in_memory();

    thread::scope(|s| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|w| {
                let db = &db;
                s.spawn(move || -> geobucket_core::Result<()> {
                    for i in 0..LISTINGS_PER_WORKER {
                        // every worker walks the same 100 spots with its own spelling
                        let spot = i % 100;
                        let lat = 6.40 + (spot / 10) as f64 * 0.01;
                        let lng = 3.35 + (spot % 10) as f64 * 0.01;
                        let bucket = db.assign(lat, lng, &format!("Estate {spot} (agent {w})"))?;
                        db.attach_member(bucket.id)?;
                    }
                    Ok(())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker panicked"))
            .collect::<geobucket_core::Result<Vec<()>>>()
    })?;

    let stats = db.bucket_stats()?;
    println!("buckets:  {}", db.store().bucket_count()?);
    println!("members:  {}", stats.total_members);
    println!("variants: {}", db.store().entry_count());
    assert_eq!(stats.total_members, (WORKERS * LISTINGS_PER_WORKER) as u64);
    Ok(())
}
