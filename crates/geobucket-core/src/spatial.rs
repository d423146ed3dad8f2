// crates/geobucket-core/src/spatial.rs

//! # Spatial Indexer
//!
//! Maps coordinates onto the H3 hexagonal grid at a fixed resolution and
//! back. Resolution 9 gives cells of roughly 174 m across, about one
//! neighborhood, which is the unit a bucket represents.
//!
//! Everything here is pure and can be called from any number of threads.

use crate::common::Coord;
use crate::error::{GeoBucketError, Result};
use h3o::{CellIndex, LatLng, Resolution};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Grid resolution used for bucketing.
pub const RESOLUTION: Resolution = Resolution::Nine;

/// Length of the textual form of a [`CellId`].
pub const CELL_ID_LEN: usize = 15;

/// Identifier of one hexagonal cell.
///
/// Displays as the canonical 15 character lower-case hex string
/// (`89xxxxxxxxxxxxx` at resolution 9) and serializes the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(CellIndex);

impl CellId {
    pub fn index(&self) -> CellIndex {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CellId {
    type Err = GeoBucketError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<CellIndex>()
            .map(CellId)
            .map_err(|e| GeoBucketError::InvalidData(format!("bad cell id {s:?}: {e}")))
    }
}

impl From<CellIndex> for CellId {
    fn from(index: CellIndex) -> Self {
        CellId(index)
    }
}

impl Serialize for CellId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CellId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Cell containing `coord`.
///
/// Only non-finite input fails; range checking is the caller's business
/// (see [`cell_of_checked`]).
pub fn cell_of(coord: Coord) -> Result<CellId> {
    let ll = LatLng::new(coord.lat, coord.lng).map_err(|_| GeoBucketError::InvalidCoordinate {
        lat: coord.lat,
        lng: coord.lng,
    })?;
    Ok(CellId(ll.to_cell(RESOLUTION)))
}

/// Like [`cell_of`] but rejects out-of-range latitude/longitude too.
pub fn cell_of_checked(coord: Coord) -> Result<CellId> {
    if !coord.is_valid() {
        return Err(GeoBucketError::InvalidCoordinate {
            lat: coord.lat,
            lng: coord.lng,
        });
    }
    cell_of(coord)
}

/// The center cell plus every cell within `k` grid steps.
///
/// `k = 1` is the default proximity search (7 cells away from pentagons),
/// `k = 2` the wider ring used by the opt-in extended layer (19 cells).
pub fn ring(cell: CellId, k: u32) -> Vec<CellId> {
    cell.0
        .grid_disk::<Vec<_>>(k)
        .into_iter()
        .map(CellId)
        .collect()
}

/// Geometric center of a cell. Used to seed a new bucket's centroid.
pub fn centroid(cell: CellId) -> Coord {
    let ll = LatLng::from(cell.0);
    Coord::new(ll.lat(), ll.lng())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_is_deterministic_and_fixed_length() {
        let a = cell_of(Coord::new(6.4698, 3.6285)).unwrap();
        let b = cell_of(Coord::new(6.4698, 3.6285)).unwrap();
        assert_eq!(a, b);
        let s = a.to_string();
        assert_eq!(s.len(), CELL_ID_LEN);
        assert!(s.starts_with("89"), "resolution 9 prefix, got {s}");
    }

    #[test]
    fn cell_id_round_trips_through_text() {
        let cell = cell_of(Coord::new(6.4474, 3.4716)).unwrap();
        let parsed: CellId = cell.to_string().parse().unwrap();
        assert_eq!(parsed, cell);
        assert!("not-a-cell".parse::<CellId>().is_err());
    }

    #[test]
    fn non_finite_input_is_rejected() {
        assert!(matches!(
            cell_of(Coord::new(f64::NAN, 3.0)),
            Err(GeoBucketError::InvalidCoordinate { .. })
        ));
        assert!(cell_of_checked(Coord::new(95.0, 3.0)).is_err());
    }

    #[test]
    fn ring_sizes() {
        let cell = cell_of(Coord::new(6.47, 3.63)).unwrap();
        let r1 = ring(cell, 1);
        let r2 = ring(cell, 2);
        assert_eq!(r1.len(), 7);
        assert_eq!(r2.len(), 19);
        assert!(r1.contains(&cell));
        assert!(r1.iter().all(|c| r2.contains(c)));
    }

    #[test]
    fn neighbors_are_mutual() {
        let cell = cell_of(Coord::new(6.4302, 3.4216)).unwrap();
        for n in ring(cell, 1) {
            assert!(ring(n, 1).contains(&cell));
        }
    }

    #[test]
    fn centroid_maps_back_into_cell() {
        let cell = cell_of(Coord::new(6.4698, 3.6285)).unwrap();
        let center = centroid(cell);
        assert_eq!(cell_of(center).unwrap(), cell);
        assert!((center.lat - 6.4698).abs() < 0.01);
        assert!((center.lng - 3.6285).abs() < 0.01);
    }
}
