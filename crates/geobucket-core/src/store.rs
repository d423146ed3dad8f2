// crates/geobucket-core/src/store.rs

//! # Bucket Store & Location Index (in-memory)
//!
//! [`MemoryStore`] implements both [`BucketStore`] and [`LocationIndex`]
//! behind one `parking_lot::RwLock`. The handle is cheap to clone and can be
//! shared across worker threads.
//!
//! Cell uniqueness is checked and the bucket inserted under the same write
//! lock, so concurrent creators of one cell see exactly one success. Member
//! counts live in a per-bucket `AtomicU64` and are adjusted with a
//! compare-and-swap loop while only a read lock is held.

use crate::common::{BucketId, Coord};
use crate::error::{GeoBucketError, Result};
use crate::model::{GeoBucket, LocationIndexEntry, VariantNames};
use crate::spatial::CellId;
use crate::traits::{BucketStore, LocationIndex};
use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Authoritative copy of one bucket.
#[derive(Debug)]
struct BucketSlot {
    id: BucketId,
    cell: CellId,
    centroid: Coord,
    canonical_name: String,
    variants: RwLock<VariantNames>,
    member_count: AtomicU64,
}

impl BucketSlot {
    fn snapshot(&self) -> GeoBucket {
        GeoBucket {
            id: self.id,
            cell_id: self.cell,
            centroid: self.centroid,
            canonical_name: self.canonical_name.clone(),
            variant_names: self.variants.read().clone(),
            member_count: self.member_count.load(Ordering::Acquire),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    buckets: BTreeMap<BucketId, Arc<BucketSlot>>,
    by_cell: HashMap<CellId, BucketId>,
    /// Lower-cased canonical name -> buckets.
    by_name: HashMap<String, Vec<BucketId>>,
    entries: Vec<LocationIndexEntry>,
    entry_keys: HashSet<(String, BucketId)>,
    /// Phonetic code -> positions in `entries`.
    by_phonetic: HashMap<String, Vec<usize>>,
    next_id: u64,
}

impl Inner {
    fn slot(&self, id: BucketId) -> Result<Arc<BucketSlot>> {
        self.buckets
            .get(&id)
            .cloned()
            .ok_or(GeoBucketError::UnknownBucket(id))
    }

    /// Fails without touching any map if `slot.id` is the last possible id.
    fn insert_slot(&mut self, slot: BucketSlot) -> Result<()> {
        let id = slot.id;
        let after = id.0.checked_add(1).ok_or_else(|| {
            GeoBucketError::InvalidData(format!("bucket id {id} leaves no room for further ids"))
        })?;
        self.by_cell.insert(slot.cell, id);
        self.by_name
            .entry(slot.canonical_name.to_lowercase())
            .or_default()
            .push(id);
        self.next_id = self.next_id.max(after);
        self.buckets.insert(id, Arc::new(slot));
        Ok(())
    }

    fn insert_entry(&mut self, entry: LocationIndexEntry) -> bool {
        let key = (entry.original_name.clone(), entry.bucket);
        if !self.entry_keys.insert(key) {
            return false;
        }
        let pos = self.entries.len();
        if !entry.phonetic_code.is_empty() {
            self.by_phonetic
                .entry(entry.phonetic_code.clone())
                .or_default()
                .push(pos);
        }
        self.entries.push(entry);
        true
    }
}

/// Serializable image of a [`MemoryStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub buckets: Vec<GeoBucket>,
    pub entries: Vec<LocationIndexEntry>,
}

/// In-process implementation of [`BucketStore`] and [`LocationIndex`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of location index entries.
    pub fn entry_count(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Copies the full contents out, buckets in id order.
    pub fn export(&self) -> StoreSnapshot {
        let inner = self.inner.read();
        StoreSnapshot {
            buckets: inner.buckets.values().map(|s| s.snapshot()).collect(),
            entries: inner.entries.clone(),
        }
    }

    /// Rebuilds a store from a snapshot, re-deriving every side map.
    ///
    /// Fails with `InvalidData` if two buckets share a cell or id, or an
    /// entry points at a bucket that is not in the snapshot.
    pub fn import(snapshot: StoreSnapshot) -> Result<Self> {
        let mut inner = Inner::default();
        for b in snapshot.buckets {
            if inner.by_cell.contains_key(&b.cell_id) || inner.buckets.contains_key(&b.id) {
                return Err(GeoBucketError::InvalidData(format!(
                    "duplicate bucket {} / cell {} in snapshot",
                    b.id, b.cell_id
                )));
            }
            inner.insert_slot(BucketSlot {
                id: b.id,
                cell: b.cell_id,
                centroid: b.centroid,
                canonical_name: b.canonical_name,
                variants: RwLock::new(b.variant_names),
                member_count: AtomicU64::new(b.member_count),
            })?;
        }
        for e in snapshot.entries {
            if !inner.buckets.contains_key(&e.bucket) {
                return Err(GeoBucketError::InvalidData(format!(
                    "index entry {:?} references missing bucket {}",
                    e.original_name, e.bucket
                )));
            }
            inner.insert_entry(e);
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(inner)),
        })
    }
}

impl BucketStore for MemoryStore {
    fn find_by_cell(&self, cell: CellId) -> Result<Option<GeoBucket>> {
        let inner = self.inner.read();
        Ok(inner
            .by_cell
            .get(&cell)
            .and_then(|id| inner.buckets.get(id))
            .map(|s| s.snapshot()))
    }

    fn find_by_id(&self, id: BucketId) -> Result<Option<GeoBucket>> {
        Ok(self.inner.read().buckets.get(&id).map(|s| s.snapshot()))
    }

    fn create(
        &self,
        cell: CellId,
        centroid: Coord,
        canonical_name: &str,
        first_variant: &str,
    ) -> Result<GeoBucket> {
        let mut inner = self.inner.write();
        if inner.by_cell.contains_key(&cell) {
            return Err(GeoBucketError::BucketConflict(cell));
        }
        let mut variants = VariantNames::new();
        if !first_variant.is_empty() {
            variants.insert(first_variant);
        }
        let id = BucketId(inner.next_id);
        let slot = BucketSlot {
            id,
            cell,
            centroid,
            canonical_name: canonical_name.to_owned(),
            variants: RwLock::new(variants),
            member_count: AtomicU64::new(0),
        };
        let bucket = slot.snapshot();
        inner.insert_slot(slot)?;
        debug!("created bucket {id} for cell {cell} ({canonical_name:?})");
        Ok(bucket)
    }

    fn add_variant(&self, bucket: BucketId, name: &str) -> Result<()> {
        let slot = self.inner.read().slot(bucket)?;
        slot.variants.write().insert(name);
        Ok(())
    }

    fn adjust_member_count(&self, bucket: BucketId, delta: i64) -> Result<u64> {
        let slot = self.inner.read().slot(bucket)?;
        let apply = |cur: u64| -> u64 {
            let next = i128::from(cur) + i128::from(delta);
            next.clamp(0, i128::from(u64::MAX)) as u64
        };
        // The closure always returns Some, so this cannot be Err.
        let prev = match slot
            .member_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| Some(apply(cur)))
        {
            Ok(prev) | Err(prev) => prev,
        };
        if i128::from(prev) + i128::from(delta) < 0 {
            warn!("member count of bucket {bucket} would drop below zero (was {prev}, delta {delta}); clamped");
        }
        Ok(apply(prev))
    }

    fn find_by_exact_canonical_name(&self, name: &str) -> Result<Vec<GeoBucket>> {
        let inner = self.inner.read();
        Ok(inner
            .by_name
            .get(&name.to_lowercase())
            .into_iter()
            .flatten()
            .filter_map(|id| inner.buckets.get(id))
            .map(|s| s.snapshot())
            .collect())
    }

    fn find_by_cell_set(&self, cells: &[CellId]) -> Result<Vec<GeoBucket>> {
        let inner = self.inner.read();
        Ok(cells
            .iter()
            .filter_map(|c| inner.by_cell.get(c))
            .filter_map(|id| inner.buckets.get(id))
            .map(|s| s.snapshot())
            .collect())
    }

    fn all_buckets(&self) -> Result<Vec<GeoBucket>> {
        Ok(self
            .inner
            .read()
            .buckets
            .values()
            .map(|s| s.snapshot())
            .collect())
    }

    fn bucket_count(&self) -> Result<usize> {
        Ok(self.inner.read().buckets.len())
    }
}

impl LocationIndex for MemoryStore {
    fn record_variant_occurrence(
        &self,
        bucket: BucketId,
        raw_name: &str,
        canonical_name: &str,
    ) -> Result<bool> {
        // Derive keys before taking the lock.
        let entry = LocationIndexEntry::new(bucket, raw_name, canonical_name);
        let mut inner = self.inner.write();
        if !inner.buckets.contains_key(&bucket) {
            return Err(GeoBucketError::UnknownBucket(bucket));
        }
        Ok(inner.insert_entry(entry))
    }

    fn find_by_trigram_prefix(&self, prefix: &str) -> Result<Vec<LocationIndexEntry>> {
        let prefix = prefix.to_lowercase();
        let inner = self.inner.read();
        Ok(inner
            .entries
            .iter()
            .filter(|e| e.canonical_name.to_lowercase().contains(&prefix))
            .cloned()
            .collect())
    }

    fn find_by_phonetic_code(&self, code: &str) -> Result<Vec<LocationIndexEntry>> {
        let inner = self.inner.read();
        Ok(inner
            .by_phonetic
            .get(code)
            .into_iter()
            .flatten()
            .map(|&pos| inner.entries[pos].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{cell_of, centroid};

    fn cell(lat: f64, lng: f64) -> CellId {
        cell_of(Coord::new(lat, lng)).unwrap()
    }

    #[test]
    fn create_conflicts_on_taken_cell() {
        let store = MemoryStore::new();
        let c = cell(6.5244, 3.3792);
        let b = store.create(c, centroid(c), "yaba", "Yaba").unwrap();
        assert_eq!(b.variants(), ["Yaba"]);
        assert_eq!(b.member_count, 0);
        let err = store.create(c, centroid(c), "yaba", "Yaba").unwrap_err();
        assert!(matches!(err, GeoBucketError::BucketConflict(x) if x == c));
        assert_eq!(store.bucket_count().unwrap(), 1);
    }

    #[test]
    fn empty_first_variant_is_not_stored() {
        let store = MemoryStore::new();
        let c = cell(6.6, 3.35);
        let b = store.create(c, centroid(c), "", "").unwrap();
        assert!(b.variant_names.is_empty());
    }

    #[test]
    fn add_variant_is_idempotent() {
        let store = MemoryStore::new();
        let c = cell(6.4302, 3.4216);
        let b = store.create(c, centroid(c), "vi", "VI").unwrap();
        store.add_variant(b.id, "Victoria Island").unwrap();
        store.add_variant(b.id, "VI").unwrap();
        store.add_variant(b.id, "Victoria Island").unwrap();
        let b = store.find_by_id(b.id).unwrap().unwrap();
        assert_eq!(b.variants(), ["VI", "Victoria Island"]);
    }

    #[test]
    fn member_count_clamps_at_zero() {
        let store = MemoryStore::new();
        let c = cell(6.6018, 3.3569);
        let b = store.create(c, centroid(c), "ikeja", "Ikeja").unwrap();
        assert_eq!(store.adjust_member_count(b.id, 3).unwrap(), 3);
        assert_eq!(store.adjust_member_count(b.id, -1).unwrap(), 2);
        assert_eq!(store.adjust_member_count(b.id, -5).unwrap(), 0);
        assert_eq!(store.find_by_id(b.id).unwrap().unwrap().member_count, 0);
    }

    #[test]
    fn unknown_bucket_is_reported() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.adjust_member_count(BucketId(42), 1),
            Err(GeoBucketError::UnknownBucket(BucketId(42)))
        ));
        assert!(store.add_variant(BucketId(42), "x").is_err());
        assert!(store.record_variant_occurrence(BucketId(42), "x", "x").is_err());
    }

    #[test]
    fn canonical_name_lookup_ignores_case() {
        let store = MemoryStore::new();
        let c = cell(6.4474, 3.4716);
        store.create(c, centroid(c), "lekki phase 1", "Lekki Phase 1").unwrap();
        assert_eq!(store.find_by_exact_canonical_name("LEKKI PHASE 1").unwrap().len(), 1);
        assert!(store.find_by_exact_canonical_name("lekki").unwrap().is_empty());
    }

    #[test]
    fn cell_set_lookup() {
        let store = MemoryStore::new();
        let a = cell(6.4698, 3.6285);
        let far = cell(9.0765, 7.3986);
        store.create(a, centroid(a), "sangotedo", "Sangotedo").unwrap();
        store.create(far, centroid(far), "abuja", "Abuja").unwrap();
        let hits = store.find_by_cell_set(&crate::spatial::ring(a, 1)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].canonical_name, "sangotedo");
    }

    #[test]
    fn index_insert_is_idempotent_per_bucket() {
        let store = MemoryStore::new();
        let c = cell(6.4667, 3.5833);
        let b = store.create(c, centroid(c), "ajah", "Ajah").unwrap();
        assert!(store.record_variant_occurrence(b.id, "Ajah", "ajah").unwrap());
        assert!(!store.record_variant_occurrence(b.id, "Ajah", "ajah").unwrap());
        assert!(store.record_variant_occurrence(b.id, "ajah", "ajah").unwrap());
        assert_eq!(store.entry_count(), 2);
        assert_eq!(store.find_by_phonetic_code("AJH").unwrap().len(), 2);
        assert_eq!(store.find_by_trigram_prefix("AJA").unwrap().len(), 2);
        assert!(store.find_by_trigram_prefix("xyz").unwrap().is_empty());
    }

    #[test]
    fn export_import_round_trip() {
        let store = MemoryStore::new();
        let c = cell(6.4667, 3.5833);
        let b = store.create(c, centroid(c), "ajah", "Ajah").unwrap();
        store.add_variant(b.id, "Ajah, Lagos").unwrap();
        store.adjust_member_count(b.id, 2).unwrap();
        store.record_variant_occurrence(b.id, "Ajah", "ajah").unwrap();

        let restored = MemoryStore::import(store.export()).unwrap();
        assert_eq!(restored.all_buckets().unwrap(), store.all_buckets().unwrap());
        assert_eq!(restored.entry_count(), 1);
        // ids keep counting past the restored ones
        let d = cell(6.5244, 3.3792);
        let next = restored.create(d, centroid(d), "yaba", "Yaba").unwrap();
        assert!(next.id > b.id);
    }

    #[test]
    fn import_rejects_duplicate_cells() {
        let store = MemoryStore::new();
        let c = cell(6.4667, 3.5833);
        store.create(c, centroid(c), "ajah", "Ajah").unwrap();
        let mut snap = store.export();
        let mut dup = snap.buckets[0].clone();
        dup.id = BucketId(99);
        snap.buckets.push(dup);
        assert!(matches!(
            MemoryStore::import(snap),
            Err(GeoBucketError::InvalidData(_))
        ));
    }

    #[test]
    fn import_rejects_last_possible_id() {
        let store = MemoryStore::new();
        let c = cell(6.4667, 3.5833);
        store.create(c, centroid(c), "ajah", "Ajah").unwrap();
        let mut snap = store.export();
        snap.buckets[0].id = BucketId(u64::MAX);
        assert!(matches!(
            MemoryStore::import(snap),
            Err(GeoBucketError::InvalidData(_))
        ));
    }
}
