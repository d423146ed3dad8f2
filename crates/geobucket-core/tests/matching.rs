use geobucket_core::spatial::{cell_of, centroid, ring};
use geobucket_core::{BucketId, BucketStore, Coord, GeoBuckets, MatchLayer, MatchRequest, MemoryStore};
use std::collections::{BTreeSet, HashMap};

fn ids(db: &GeoBuckets<MemoryStore>, query: &str, near: Option<Coord>) -> BTreeSet<BucketId> {
    db.search(query, near)
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect()
}

/// Three listings spelled differently around Sangotedo; returns
/// listing number -> bucket it was filed under.
fn sangotedo_listings(db: &GeoBuckets<MemoryStore>) -> HashMap<u32, BucketId> {
    let listings = [
        (1, 6.4698, 3.6285, "Sangotedo"),
        (2, 6.4720, 3.6301, "Sangotedo, Ajah"),
        (3, 6.4705, 3.6290, "sangotedo lagos"),
    ];
    listings
        .into_iter()
        .map(|(listing, lat, lng, name)| {
            let bucket = db.assign(lat, lng, name).unwrap();
            db.attach_member(bucket.id).unwrap();
            (listing, bucket.id)
        })
        .collect()
}

#[test]
fn differently_spelled_listings_converge() {
    let db = GeoBuckets::in_memory();
    let filed = sangotedo_listings(&db);

    let found = ids(&db, "sangotedo", Some(Coord::new(6.47, 3.63)));
    let reached: Vec<u32> = filed
        .iter()
        .filter(|(_, bucket)| found.contains(bucket))
        .map(|(listing, _)| *listing)
        .collect();
    assert_eq!(reached.len(), 3, "found {found:?}, filed {filed:?}");

    // the coordinate hint is not needed for this one
    assert_eq!(ids(&db, "sangotedo", None), found);
}

#[test]
fn query_case_does_not_matter() {
    let db = GeoBuckets::in_memory();
    sangotedo_listings(&db);
    let lower = ids(&db, "sangotedo", None);
    assert!(!lower.is_empty());
    assert_eq!(ids(&db, "SANGOTEDO", None), lower);
    assert_eq!(ids(&db, "SanGoTedo", None), lower);
}

#[test]
fn typos_reach_the_bucket_through_edit_distance() {
    let db = GeoBuckets::in_memory();
    let ajah = db.assign(6.4667, 3.5833, "Ajah").unwrap();
    assert_eq!(ajah.canonical_name, "ajah");

    for query in ["ajsh", "aja"] {
        let hits = db.search_with_trace(&MatchRequest::new(query)).unwrap();
        assert_eq!(hits.len(), 1, "query {query:?}");
        assert_eq!(hits[0].bucket.id, ajah.id);
        assert_eq!(hits[0].layer, MatchLayer::Fuzzy);
    }
}

#[test]
fn unrelated_query_finds_nothing() {
    let db = GeoBuckets::in_memory();
    sangotedo_listings(&db);
    db.assign(6.4667, 3.5833, "Ajah").unwrap();
    assert!(db.search("CompletelyUnrelatedXYZ123", None).unwrap().is_empty());
    assert!(db.search("", None).unwrap().is_empty());
}

#[test]
fn adjacent_cells_see_each_other() {
    let here = cell_of(Coord::new(6.4474, 3.4716)).unwrap();
    for neighbor in ring(here, 1).into_iter().filter(|c| *c != here) {
        assert!(ring(neighbor, 1).contains(&here));
    }
}

#[test]
fn buckets_three_rings_away_need_a_name_match() {
    let db = GeoBuckets::in_memory();
    let here = Coord::new(6.4474, 3.4716);
    let origin = cell_of(here).unwrap();
    let ring2 = ring(origin, 2);
    let far_cell = ring(origin, 3)
        .into_iter()
        .find(|c| !ring2.contains(c))
        .unwrap();
    let far = centroid(far_cell);
    db.assign(far.lat, far.lng, "Lekki Phase One").unwrap();

    // shares only a word with the bucket, so proximity would be the only link
    assert!(db.search("phase", Some(here)).unwrap().is_empty());
    let extended = MatchRequest::new("phase").near(here.lat, here.lng).extended(true);
    assert!(db.search_with(&extended).unwrap().is_empty());
}

#[test]
fn stats_over_one_two_three_members() {
    let db = GeoBuckets::in_memory();
    let spots = [(6.50, 3.30, 1), (6.51, 3.31, 2), (6.52, 3.32, 3)];
    for (lat, lng, members) in spots {
        let b = db.assign(lat, lng, "Somewhere").unwrap();
        for _ in 0..members {
            db.attach_member(b.id).unwrap();
        }
    }

    let stats = db.bucket_stats().unwrap();
    assert_eq!(stats.total_buckets, 3);
    assert_eq!(stats.total_members, 6);
    assert_eq!(stats.avg_members_per_bucket, 2.0);
    assert_eq!(stats.max_members_in_bucket, 3);
    assert_eq!(stats.min_members_in_bucket, 1);
    assert_eq!(stats.buckets_with_members, 3);
    assert_eq!(stats.empty_buckets, 0);

    let details = db.bucket_details().unwrap();
    let counts: Vec<u64> = details.iter().map(|d| d.member_count).collect();
    assert_eq!(counts, vec![3, 2, 1]);
}

#[test]
fn moving_a_member_updates_both_buckets() {
    let db = GeoBuckets::in_memory();
    let from = db.assign(6.6018, 3.3569, "Ikeja").unwrap();
    let to = db.assign(6.5244, 3.3792, "Yaba").unwrap();
    db.attach_member(from.id).unwrap();

    db.reassign_member(Some(from.id), Some(to.id)).unwrap();

    let count = |id: BucketId| db.store().find_by_id(id).unwrap().unwrap().member_count;
    assert_eq!(count(from.id), 0);
    assert_eq!(count(to.id), 1);

    // detaching past zero clamps
    assert_eq!(db.detach_member(from.id).unwrap(), 0);
}

#[test]
fn min_results_stops_the_cascade_early() {
    let db = GeoBuckets::in_memory();
    let exact = db.assign(6.4667, 3.5833, "Ajah").unwrap();
    db.assign(6.4800, 3.6000, "Ajahh").unwrap();

    let one = db
        .search_with_trace(&MatchRequest::new("ajah").min_results(1))
        .unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].bucket.id, exact.id);

    // with the default threshold the fuzzy layer adds the misspelled bucket
    assert_eq!(db.search("ajah", None).unwrap().len(), 2);
}
