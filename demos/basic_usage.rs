//! File a handful of listings and query them back.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --example basic_usage
use geobucket_rs::prelude::*;

fn main() -> Result<()> {
    env_logger::init();
    let db = GeoBuckets::in_memory();

    let listings = [
        ("Sangotedo", 6.4698, 3.6285),
        ("Sangotedo, Ajah", 6.4720, 3.6301),
        ("sangotedo lagos", 6.4705, 3.6290),
        ("Ajah", 6.4667, 3.5833),
        ("Lekki Phase 1, Lagos State", 6.4474, 3.4716),
        ("Victoria Island", 6.4302, 3.4216),
        ("V.I.", 6.4302, 3.4216),
    ];
    for (name, lat, lng) in listings {
        let bucket = db.assign(lat, lng, name)?;
        db.attach_member(bucket.id)?;
        println!("{name:<28} -> bucket #{} ({:?})", bucket.id, bucket.canonical_name);
    }

    println!();
    for query in ["sangotedo", "SanGoTedo", "ajsh", "lekki", "victoria"] {
        let hits = db.search_with_trace(&MatchRequest::new(query).near(6.47, 3.63))?;
        println!("{query:?}: {} bucket(s)", hits.len());
        for hit in hits {
            println!("    [{}] #{} {:?}", hit.layer, hit.bucket.id, hit.bucket.canonical_name);
        }
    }

    if let Some(Coord { lat, lng }) = db.geocode("Ajah")? {
        println!("\nAjah is at {lat:.5}, {lng:.5}");
    }

    let stats = db.bucket_stats()?;
    println!(
        "\n{} buckets, {} members, {:.2} per bucket",
        stats.total_buckets, stats.total_members, stats.avg_members_per_bucket
    );
    Ok(())
}
