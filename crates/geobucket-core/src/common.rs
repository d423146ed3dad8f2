// crates/geobucket-core/src/common.rs
use crate::spatial::CellId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned bucket identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(pub u64);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A WGS84 point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Aggregate statistics over all buckets.
///
/// Returned by [`crate::BucketService::bucket_stats`]. With zero buckets
/// every field is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketStats {
    pub total_buckets: usize,
    pub total_members: u64,
    /// Rounded to two decimals.
    pub avg_members_per_bucket: f64,
    pub max_members_in_bucket: u64,
    pub min_members_in_bucket: u64,
    pub buckets_with_members: usize,
    pub empty_buckets: usize,
}

/// One row of [`crate::BucketService::bucket_details`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketDetail {
    pub id: BucketId,
    pub cell_id: CellId,
    pub canonical_name: String,
    pub variant_names: Vec<String>,
    pub member_count: u64,
    pub centroid: Coord,
}
