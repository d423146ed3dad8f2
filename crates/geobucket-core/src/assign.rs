// crates/geobucket-core/src/assign.rs

//! # Bucket Assignment
//!
//! Find-or-create of the bucket for a `(coordinate, raw name)` pair, plus the
//! member counter bookkeeping callers run when they attach, move or remove
//! their own records.

use crate::common::{BucketDetail, BucketId, BucketStats, Coord};
use crate::error::{GeoBucketError, Result};
use crate::model::GeoBucket;
use crate::spatial::{self, CellId};
use crate::text::normalize;
use crate::traits::{BucketStore, LocationIndex};
use log::{debug, warn};

/// How many times a lost create race is retried before giving up.
const MAX_CREATE_ATTEMPTS: usize = 3;

/// Stateless service over a store handle.
#[derive(Debug, Clone)]
pub struct BucketService<S> {
    store: S,
}

impl<S> BucketService<S>
where
    S: BucketStore + LocationIndex,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the bucket for the cell containing `(lat, lng)`, creating it
    /// if needed, and records `raw_name` as a variant of it.
    ///
    /// A new bucket is centered on the cell, not on the given coordinate, and
    /// takes `normalize(raw_name)` as its canonical name. Repeating the call
    /// with the same arguments returns the same bucket and leaves the
    /// variants unchanged. Safe to call concurrently for the same cell.
    pub fn assign(&self, lat: f64, lng: f64, raw_name: &str) -> Result<GeoBucket> {
        let coord = Coord::new(lat, lng);
        if !coord.is_valid() {
            return Err(GeoBucketError::InvalidCoordinate { lat, lng });
        }
        let cell = spatial::cell_of(coord)?;
        let canonical = normalize(raw_name);

        let bucket = self.find_or_create(cell, &canonical, raw_name)?;
        if !raw_name.is_empty() {
            self.store
                .record_variant_occurrence(bucket.id, raw_name, &canonical)?;
        }
        Ok(bucket)
    }

    fn find_or_create(&self, cell: CellId, canonical: &str, raw_name: &str) -> Result<GeoBucket> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            if let Some(existing) = self.store.find_by_cell(cell)? {
                if raw_name.is_empty() || existing.variant_names.contains(raw_name) {
                    return Ok(existing);
                }
                self.store.add_variant(existing.id, raw_name)?;
                // re-read so the caller sees the variant just added
                return Ok(self.store.find_by_id(existing.id)?.unwrap_or(existing));
            }

            match self
                .store
                .create(cell, spatial::centroid(cell), canonical, raw_name)
            {
                Ok(created) => return Ok(created),
                Err(GeoBucketError::BucketConflict(_)) => {
                    debug!("lost create race for cell {cell} (attempt {attempt}), re-reading");
                }
                Err(e) => return Err(e),
            }
        }
        warn!("giving up on cell {cell} after {MAX_CREATE_ATTEMPTS} create conflicts");
        Err(GeoBucketError::BucketConflict(cell))
    }

    /// A member joined `bucket`. Returns the new count.
    pub fn attach_member(&self, bucket: BucketId) -> Result<u64> {
        self.store.adjust_member_count(bucket, 1)
    }

    /// A member left `bucket`. Returns the new count (never below zero).
    pub fn detach_member(&self, bucket: BucketId) -> Result<u64> {
        self.store.adjust_member_count(bucket, -1)
    }

    /// A member moved from `old` to `new`; either side may be absent.
    pub fn reassign_member(&self, old: Option<BucketId>, new: Option<BucketId>) -> Result<()> {
        if old == new {
            return Ok(());
        }
        if let Some(old) = old {
            self.detach_member(old)?;
        }
        if let Some(new) = new {
            self.attach_member(new)?;
        }
        Ok(())
    }

    pub fn bucket_stats(&self) -> Result<BucketStats> {
        let buckets = self.store.all_buckets()?;
        if buckets.is_empty() {
            return Ok(BucketStats::default());
        }

        let counts: Vec<u64> = buckets.iter().map(|b| b.member_count).collect();
        let total: u64 = counts.iter().sum();
        let with_members = counts.iter().filter(|&&c| c > 0).count();
        let avg = total as f64 / counts.len() as f64;

        Ok(BucketStats {
            total_buckets: buckets.len(),
            total_members: total,
            avg_members_per_bucket: (avg * 100.0).round() / 100.0,
            max_members_in_bucket: counts.iter().copied().max().unwrap_or(0),
            min_members_in_bucket: counts.iter().copied().min().unwrap_or(0),
            buckets_with_members: with_members,
            empty_buckets: buckets.len() - with_members,
        })
    }

    /// All buckets, most populated first, ties broken by canonical name.
    pub fn bucket_details(&self) -> Result<Vec<BucketDetail>> {
        let mut buckets = self.store.all_buckets()?;
        buckets.sort_by(|a, b| {
            b.member_count
                .cmp(&a.member_count)
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        });
        Ok(buckets.iter().map(GeoBucket::detail).collect())
    }
}
