// crates/geobucket-core/src/error.rs
use crate::common::BucketId;
use crate::spatial::CellId;
use thiserror::Error;

/// Errors raised by the bucketing core.
///
/// "Nothing matched" is never an error: the matcher returns an empty list.
/// A [`GeoBucketError::StoreUnavailable`] therefore always means the search
/// itself is broken, not that the query had no hits.
#[derive(Debug, Error)]
pub enum GeoBucketError {
    /// Latitude outside `[-90, 90]`, longitude outside `[-180, 180]`, or a
    /// non-finite value. Callers can drop the coordinate and retry name-only.
    #[error("invalid coordinate: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Another writer created the bucket for this cell first.
    ///
    /// Returned by [`crate::traits::BucketStore::create`]; the assignment
    /// service recovers from it by re-reading the cell.
    #[error("a bucket already exists for cell {0}")]
    BucketConflict(CellId),

    /// The caller referenced a bucket id the store does not hold.
    #[error("unknown bucket id {0}")]
    UnknownBucket(BucketId),

    /// The backing repository failed. Fatal to the current call only.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "snapshot")]
    #[error("snapshot decode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, GeoBucketError>;
