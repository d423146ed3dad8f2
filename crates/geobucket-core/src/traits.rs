// crates/geobucket-core/src/traits.rs
use crate::common::{BucketId, Coord};
use crate::error::Result;
use crate::model::{GeoBucket, LocationIndexEntry};
use crate::spatial::CellId;

/// Repository of buckets keyed by cell id.
///
/// Implementations must guarantee **one bucket per cell**: [`BucketStore::create`]
/// fails with [`crate::GeoBucketError::BucketConflict`] when the cell is
/// already taken, and the caller re-reads with [`BucketStore::find_by_cell`].
/// The member counter must be adjusted atomically inside the store.
///
/// Every method is fallible so a remote repository can report
/// [`crate::GeoBucketError::StoreUnavailable`]; the core propagates those
/// errors unchanged.
///
/// # Examples
/// ```rust
/// use geobucket_core::{BucketStore, Coord, MemoryStore};
/// use geobucket_core::spatial::{cell_of, centroid};
///
/// let store = MemoryStore::new();
/// let cell = cell_of(Coord::new(6.5244, 3.3792)).unwrap();
/// let bucket = store.create(cell, centroid(cell), "yaba", "Yaba").unwrap();
///
/// assert!(store.create(cell, centroid(cell), "yaba", "Yaba").is_err());
/// assert_eq!(store.find_by_cell(cell).unwrap().map(|b| b.id), Some(bucket.id));
/// ```
pub trait BucketStore: Send + Sync {
    fn find_by_cell(&self, cell: CellId) -> Result<Option<GeoBucket>>;

    fn find_by_id(&self, id: BucketId) -> Result<Option<GeoBucket>>;

    /// Inserts a new bucket. `first_variant` is skipped when empty.
    fn create(
        &self,
        cell: CellId,
        centroid: Coord,
        canonical_name: &str,
        first_variant: &str,
    ) -> Result<GeoBucket>;

    /// Appends `name` to the bucket's variants; no-op if present verbatim.
    fn add_variant(&self, bucket: BucketId, name: &str) -> Result<()>;

    /// Atomically adds `delta` to the member count and returns the new value.
    /// The result is clamped at zero.
    fn adjust_member_count(&self, bucket: BucketId, delta: i64) -> Result<u64>;

    /// Buckets whose canonical name equals `name`, ignoring case.
    fn find_by_exact_canonical_name(&self, name: &str) -> Result<Vec<GeoBucket>>;

    /// Buckets located in any of `cells`.
    fn find_by_cell_set(&self, cells: &[CellId]) -> Result<Vec<GeoBucket>>;

    /// Full scan, in id order.
    fn all_buckets(&self) -> Result<Vec<GeoBucket>>;

    fn bucket_count(&self) -> Result<usize>;
}

/// Secondary lookup structure over raw spellings, independent of cells.
pub trait LocationIndex: Send + Sync {
    /// Inserts an entry for `(raw_name, bucket)` unless one exists.
    /// Returns `true` when a new entry was written.
    fn record_variant_occurrence(
        &self,
        bucket: BucketId,
        raw_name: &str,
        canonical_name: &str,
    ) -> Result<bool>;

    /// Entries whose canonical name contains `prefix` (lower-cased).
    fn find_by_trigram_prefix(&self, prefix: &str) -> Result<Vec<LocationIndexEntry>>;

    fn find_by_phonetic_code(&self, code: &str) -> Result<Vec<LocationIndexEntry>>;
}
