// crates/geobucket-core/src/loader/snapshot.rs
use super::common_io;
use crate::error::Result;
use crate::store::{MemoryStore, StoreSnapshot};
use bincode::Options;
use log::info;
use std::path::Path;

/// Upper bound for a decoded snapshot, so a corrupt length prefix fails
/// instead of allocating.
const SNAPSHOT_LIMIT: u64 = 256 * 1024 * 1024;

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(SNAPSHOT_LIMIT)
}

impl MemoryStore {
    /// Writes every bucket and index entry to `path` with bincode
    /// (gzip-compressed when `compact` is enabled).
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.export();
        let mut writer = common_io::create_stream(path)?;
        codec().serialize_into(&mut writer, &snapshot)?;
        writer.finish()?;
        info!(
            "saved {} buckets / {} index entries to {}",
            snapshot.buckets.len(),
            snapshot.entries.len(),
            path.display()
        );
        Ok(())
    }

    /// Restores a store written by [`MemoryStore::save_snapshot`].
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = common_io::open_stream(path)?;
        let snapshot: StoreSnapshot = codec().deserialize_from(reader)?;
        info!(
            "loaded {} buckets / {} index entries from {}",
            snapshot.buckets.len(),
            snapshot.entries.len(),
            path.display()
        );
        MemoryStore::import(snapshot)
    }

    /// Loads `path` if it exists, otherwise starts empty.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_snapshot(path)
        } else {
            Ok(Self::new())
        }
    }
}
