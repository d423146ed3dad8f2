//! Umbrella crate for the geobucket workspace.
//!
//! Re-exports [`geobucket_core`] so the demos under `demos/` can be run with
//! `cargo run --example <name>` from the workspace root.
pub use geobucket_core::*;

pub mod prelude {
    pub use geobucket_core::{
        BucketId, BucketStore, Coord, GeoBucket, GeoBucketError, GeoBuckets, LocationIndex,
        MatchLayer, MatchRequest, MatcherConfig, MemoryStore, Result,
    };
}
