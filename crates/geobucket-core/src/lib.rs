// crates/geobucket-core/src/lib.rs

//! Geo-bucketing and fuzzy location matching.
//!
//! Records are grouped by the H3 cell their coordinate falls into (a
//! *bucket*). Each bucket remembers every raw location name it was assigned
//! with, and a side index over those names lets free-text queries find the
//! right buckets despite typos, spelling variants or missing coordinates.
//!
//! Start with [`GeoBuckets`], or use [`BucketService`] and
//! [`LocationMatcher`] separately over any [`BucketStore`] +
//! [`LocationIndex`] implementation.

pub mod assign;
pub mod common;
pub mod config;
pub mod db;
pub mod error;
pub mod loader;
pub mod model;
pub mod search;
pub mod spatial;
pub mod store;
pub mod text;
pub mod traits;

pub use crate::assign::BucketService;
pub use crate::common::{BucketDetail, BucketId, BucketStats, Coord};
pub use crate::config::{MatcherConfig, RegionBounds};
pub use crate::db::GeoBuckets;
pub use crate::error::{GeoBucketError, Result};
pub use crate::model::{GeoBucket, LocationIndexEntry, VariantNames};
pub use crate::search::{LocationMatcher, MatchHit, MatchLayer, MatchRequest};
pub use crate::spatial::CellId;
pub use crate::store::{MemoryStore, StoreSnapshot};
pub use crate::traits::{BucketStore, LocationIndex};
