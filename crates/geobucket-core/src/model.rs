// crates/geobucket-core/src/model.rs
use crate::common::{BucketDetail, BucketId, Coord};
use crate::spatial::CellId;
use crate::text::{phonetic_code, trigrams};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;

/// Ordered, exact-string deduplicated list of raw spellings.
///
/// Insertion order is observable (it is what `bucket_details` shows), so the
/// list is kept as a `Vec` with a side set for O(1) membership checks.
#[derive(Debug, Clone, Default)]
pub struct VariantNames {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl VariantNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` unless it is already present verbatim.
    /// Returns `true` if the list changed.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.seen.contains(name) {
            return false;
        }
        self.seen.insert(name.to_owned());
        self.ordered.push(name.to_owned());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }
}

impl PartialEq for VariantNames {
    fn eq(&self, other: &Self) -> bool {
        self.ordered == other.ordered
    }
}

impl<S: AsRef<str>> FromIterator<S> for VariantNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut v = VariantNames::new();
        for name in iter {
            v.insert(name.as_ref());
        }
        v
    }
}

impl Serialize for VariantNames {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ordered.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariantNames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<String>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

/// A geographic bucket: every member whose coordinate falls into `cell_id`.
///
/// This is a snapshot handed out by a [`crate::traits::BucketStore`]; the
/// store holds the authoritative copy and is the only place that mutates
/// variants and the member count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBucket {
    pub id: BucketId,
    pub cell_id: CellId,
    /// Center of the cell, not the coordinate of whoever created the bucket.
    pub centroid: Coord,
    pub canonical_name: String,
    pub variant_names: VariantNames,
    pub member_count: u64,
}

impl GeoBucket {
    pub fn variants(&self) -> &[String] {
        self.variant_names.as_slice()
    }

    pub fn detail(&self) -> BucketDetail {
        BucketDetail {
            id: self.id,
            cell_id: self.cell_id,
            canonical_name: self.canonical_name.clone(),
            variant_names: self.variant_names.as_slice().to_vec(),
            member_count: self.member_count,
            centroid: self.centroid,
        }
    }
}

/// One raw spelling observed for a bucket, with its match keys precomputed.
///
/// Entries are immutable: they are created once per `(original_name, bucket)`
/// pair and only disappear together with their bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationIndexEntry {
    pub original_name: String,
    pub canonical_name: String,
    pub bucket: BucketId,
    pub phonetic_code: String,
    pub trigrams: Vec<String>,
}

impl LocationIndexEntry {
    /// Builds an entry, deriving the phonetic code and trigrams from
    /// `canonical_name` so the query path never has to.
    pub fn new(bucket: BucketId, original_name: &str, canonical_name: &str) -> Self {
        Self {
            original_name: original_name.to_owned(),
            canonical_name: canonical_name.to_owned(),
            bucket,
            phonetic_code: phonetic_code(canonical_name),
            trigrams: trigrams(canonical_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_keep_insertion_order_and_dedup_verbatim() {
        let mut v = VariantNames::new();
        assert!(v.insert("Sangotedo"));
        assert!(v.insert("sangotedo lagos"));
        assert!(!v.insert("Sangotedo"));
        assert!(v.insert("sangotedo"));
        assert_eq!(v.as_slice(), ["Sangotedo", "sangotedo lagos", "sangotedo"]);
        assert!(v.contains("sangotedo lagos"));
        assert!(!v.contains("SANGOTEDO"));
    }

    #[test]
    fn index_entry_derives_keys() {
        let e = LocationIndexEntry::new(BucketId(7), "Sangotedo, Ajah", "sangotedo ajah");
        assert_eq!(e.bucket, BucketId(7));
        assert_eq!(e.trigrams.first().map(String::as_str), Some("san"));
        assert_eq!(e.phonetic_code, crate::text::phonetic_code("sangotedo ajah"));
    }
}
