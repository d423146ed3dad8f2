// crates/geobucket-core/src/config.rs
use crate::common::Coord;
use serde::{Deserialize, Serialize};

/// Lat/lng box a query coordinate must fall into before the spatial layer
/// trusts it. Coordinates outside are ignored, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl RegionBounds {
    pub fn contains(&self, coord: Coord) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lng..=self.max_lng).contains(&coord.lng)
    }
}

impl Default for RegionBounds {
    /// Nigeria, roughly.
    fn default() -> Self {
        Self {
            min_lat: 4.0,
            max_lat: 14.0,
            min_lng: 3.0,
            max_lng: 15.0,
        }
    }
}

/// Tuning knobs of the match cascade.
///
/// Every field has a default, so a JSON config file only needs to name the
/// ones it changes:
///
/// ```json
/// { "min_results": 10, "extended_spatial": true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Stop after a layer once this many buckets were collected.
    pub min_results: usize,
    /// Similarity needed by the spatial layer.
    pub good_match_threshold: f64,
    /// Similarity needed by the trigram-prefix part of the fuzzy layer.
    pub acceptable_match_threshold: f64,
    /// Maximum Levenshtein distance for the edit-distance part of the fuzzy layer.
    pub max_edit_distance: usize,
    pub region: RegionBounds,
    /// Append the ring-2 word-overlap layer to the cascade.
    pub extended_spatial: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_results: 5,
            good_match_threshold: 0.8,
            acceptable_match_threshold: 0.6,
            max_edit_distance: 2,
            region: RegionBounds::default(),
            extended_spatial: false,
        }
    }
}
