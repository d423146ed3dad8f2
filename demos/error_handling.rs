//! What the library reports, and what it deliberately does not.
//!
//! Run with:
//!     cargo run --example error_handling
use geobucket_core::{BucketId, Coord, GeoBucketError, GeoBuckets};

fn main() {
    env_logger::init();
    let db = GeoBuckets::in_memory();

    // Out-of-range coordinates are rejected before anything is stored.
    match db.assign(123.0, 3.38, "Yaba") {
        Err(GeoBucketError::InvalidCoordinate { lat, lng }) => {
            println!("rejected coordinate ({lat}, {lng}), retrying by name only");
        }
        other => println!("unexpected: {other:?}"),
    }

    // Unknown bucket ids surface as errors.
    if let Err(e) = db.attach_member(BucketId(999)) {
        println!("attach failed: {e}");
    }

    // No match is an empty list, not an error.
    match db.search("nowhere in particular", None) {
        Ok(hits) if hits.is_empty() => println!("no buckets matched"),
        Ok(hits) => println!("{} buckets matched", hits.len()),
        Err(e) => println!("search failed: {e}"),
    }

    // A hint outside the configured region is ignored rather than rejected.
    if let Ok(b) = db.assign(6.5244, 3.3792, "Yaba") {
        let london = Some(Coord::new(51.5072, -0.1276));
        match db.search("yaba", london) {
            Ok(hits) => println!("'yaba' near London still finds {} bucket(s), e.g. #{}", hits.len(), b.id),
            Err(e) => println!("search failed: {e}"),
        }
    }
}
