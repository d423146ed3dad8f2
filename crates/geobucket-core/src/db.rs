// crates/geobucket-core/src/db.rs
use crate::assign::BucketService;
use crate::common::{BucketDetail, BucketId, BucketStats, Coord};
use crate::config::MatcherConfig;
use crate::error::Result;
use crate::model::GeoBucket;
use crate::search::{LocationMatcher, MatchHit, MatchRequest};
use crate::store::MemoryStore;
use crate::traits::{BucketStore, LocationIndex};

/// Assignment and matching over one shared store.
///
/// Both halves hold a clone of the same store handle, so a bucket created by
/// [`GeoBuckets::assign`] is immediately visible to [`GeoBuckets::search`].
///
/// ```rust
/// use geobucket_core::GeoBuckets;
///
/// let db = GeoBuckets::in_memory();
/// let bucket = db.assign(6.4698, 3.6285, "Sangotedo, Ajah")?;
/// db.attach_member(bucket.id)?;
///
/// let hits = db.search("sangotedo", None)?;
/// assert_eq!(hits[0].id, bucket.id);
/// # Ok::<(), geobucket_core::GeoBucketError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GeoBuckets<S> {
    buckets: BucketService<S>,
    matcher: LocationMatcher<S>,
}

impl GeoBuckets<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S> GeoBuckets<S>
where
    S: BucketStore + LocationIndex + Clone,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, MatcherConfig::default())
    }

    pub fn with_config(store: S, config: MatcherConfig) -> Self {
        Self {
            buckets: BucketService::new(store.clone()),
            matcher: LocationMatcher::with_config(store, config),
        }
    }

    pub fn store(&self) -> &S {
        self.buckets.store()
    }

    pub fn config(&self) -> &MatcherConfig {
        self.matcher.config()
    }

    pub fn buckets(&self) -> &BucketService<S> {
        &self.buckets
    }

    pub fn matcher(&self) -> &LocationMatcher<S> {
        &self.matcher
    }

    // --- assignment ---

    pub fn assign(&self, lat: f64, lng: f64, raw_name: &str) -> Result<GeoBucket> {
        self.buckets.assign(lat, lng, raw_name)
    }

    pub fn attach_member(&self, bucket: BucketId) -> Result<u64> {
        self.buckets.attach_member(bucket)
    }

    pub fn detach_member(&self, bucket: BucketId) -> Result<u64> {
        self.buckets.detach_member(bucket)
    }

    pub fn reassign_member(&self, old: Option<BucketId>, new: Option<BucketId>) -> Result<()> {
        self.buckets.reassign_member(old, new)
    }

    pub fn bucket_stats(&self) -> Result<BucketStats> {
        self.buckets.bucket_stats()
    }

    pub fn bucket_details(&self) -> Result<Vec<BucketDetail>> {
        self.buckets.bucket_details()
    }

    // --- matching ---

    pub fn search(&self, query: &str, near: Option<Coord>) -> Result<Vec<GeoBucket>> {
        self.matcher.search(query, near)
    }

    pub fn search_with(&self, request: &MatchRequest<'_>) -> Result<Vec<GeoBucket>> {
        self.matcher.search_with(request)
    }

    pub fn search_with_trace(&self, request: &MatchRequest<'_>) -> Result<Vec<MatchHit>> {
        self.matcher.search_with_trace(request)
    }

    pub fn geocode(&self, raw_name: &str) -> Result<Option<Coord>> {
        self.matcher.geocode(raw_name)
    }
}
