//! geobucket-cli
//! =============
//!
//! Command-line interface for `geobucket-core`.
//!
//! This crate primarily provides a binary (`geobucket`). The library target
//! only exists so the crate has a rendered documentation page.
//!
//! Basic usage:
//!
//! ```text
//! geobucket assign "Sangotedo, Ajah" --lat 6.4720 --lng 3.6301
//! geobucket ingest listings.json
//! geobucket match sangotedo --lat 6.47 --lng 3.63 --trace
//! geobucket geocode "Lekki Phase 1"
//! geobucket stats --details
//! geobucket cell --lat 6.4698 --lng 3.6285 --ring 1
//! geobucket normalize "Adeola Odeku St., Lagos"
//! ```
//!
//! Buckets live in a snapshot file (`--store`, default `geobuckets.bin`)
//! that mutating commands rewrite. For programmatic access use
//! `geobucket-core` directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
