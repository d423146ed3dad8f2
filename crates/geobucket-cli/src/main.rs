//! geobucket: command-line front end for geobucket-core
//!
//! Usage examples
//! --------------
//!
//! - File a listing location
//!   $ geobucket assign "Sangotedo, Ajah" --lat 6.4720 --lng 3.6301
//!
//! - Bulk-load a JSON array of `{ "name", "lat", "lng" }` records
//!   $ geobucket ingest listings.json
//!
//! - Search, with an optional coordinate hint and a per-layer trace
//!   $ geobucket match sangotedo --lat 6.47 --lng 3.63 --trace
//!
//! - Inspect
//!   $ geobucket stats --details
//!   $ geobucket cell --lat 6.4698 --lng 3.6285 --ring 2
//!   $ geobucket normalize "Lekki Phase 1, Lagos State"
//!
//! Buckets are kept in a snapshot file (`--store`). Commands that change
//! buckets write it back when they finish.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::Context;
use clap::Parser;
use geobucket_core::spatial::{cell_of_checked, centroid, ring};
use geobucket_core::text::{normalize, phonetic_code, trigrams};
use geobucket_core::{
    Coord, GeoBucket, GeoBucketError, GeoBuckets, MatchRequest, MatcherConfig, MemoryStore,
};
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;

/// One record of an `ingest` file.
#[derive(Debug, Deserialize)]
struct Listing {
    name: String,
    lat: f64,
    lng: f64,
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match args.command {
        Commands::Assign { ref name, ref at } => {
            let db = open(&args)?;
            let bucket = db.assign(at.lat, at.lng, name)?;
            print_bucket(&bucket);
            save(&db, &args)?;
        }

        Commands::Ingest { ref file } => {
            let db = open(&args)?;
            let reader = BufReader::new(
                File::open(file).with_context(|| format!("opening {}", file.display()))?,
            );
            let listings: Vec<Listing> = serde_json::from_reader(reader)
                .with_context(|| format!("parsing {}", file.display()))?;

            let mut skipped = 0usize;
            for listing in &listings {
                match db.assign(listing.lat, listing.lng, &listing.name) {
                    Ok(bucket) => {
                        db.attach_member(bucket.id)?;
                    }
                    Err(e @ GeoBucketError::InvalidCoordinate { .. }) => {
                        warn!("skipping {:?}: {e}", listing.name);
                        skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            info!("ingested {} records from {}", listings.len(), file.display());
            println!(
                "Ingested {} of {} records ({skipped} skipped)",
                listings.len() - skipped,
                listings.len()
            );
            save(&db, &args)?;
        }

        Commands::Match {
            ref query,
            lat,
            lng,
            min_results,
            extended,
            trace,
        } => {
            let db = open(&args)?;
            let mut request = MatchRequest::new(query);
            if let (Some(lat), Some(lng)) = (lat, lng) {
                request = request.near(lat, lng);
            }
            if let Some(n) = min_results {
                request = request.min_results(n);
            }
            if extended {
                request = request.extended(true);
            }

            let hits = db.search_with_trace(&request)?;
            if hits.is_empty() {
                println!("No buckets found matching: {query}");
            }
            for hit in hits {
                if trace {
                    print!("[{}] ", hit.layer);
                }
                print_bucket(&hit.bucket);
            }
        }

        Commands::Geocode { ref name } => match open(&args)?.geocode(name)? {
            Some(c) => println!("{:.6}, {:.6}", c.lat, c.lng),
            None => eprintln!("No bucket named: {name}"),
        },

        Commands::Stats { details, json } => {
            let db = open(&args)?;
            let stats = db.bucket_stats()?;
            let rows = if details { db.bucket_details()? } else { Vec::new() };
            if json {
                let out = if details {
                    serde_json::json!({ "stats": stats, "buckets": rows })
                } else {
                    serde_json::to_value(stats)?
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Bucket statistics:");
                println!("  Buckets:              {}", stats.total_buckets);
                println!("  Members:              {}", stats.total_members);
                println!("  Avg members/bucket:   {:.2}", stats.avg_members_per_bucket);
                println!(
                    "  Max / min members:    {} / {}",
                    stats.max_members_in_bucket, stats.min_members_in_bucket
                );
                println!(
                    "  With members / empty: {} / {}",
                    stats.buckets_with_members, stats.empty_buckets
                );
                for d in rows {
                    println!(
                        "{:>6}  {:<30} {:>5} members  {}  [{}]",
                        d.id.to_string(),
                        d.canonical_name,
                        d.member_count,
                        d.cell_id,
                        d.variant_names.join(" | ")
                    );
                }
            }
        }

        Commands::Cell { ref at, ring: k } => {
            let cell = cell_of_checked(Coord::new(at.lat, at.lng))?;
            let center = centroid(cell);
            println!("Cell:     {cell}");
            println!("Centroid: {:.6}, {:.6}", center.lat, center.lng);
            let cells = ring(cell, k);
            println!("Ring {k} ({} cells):", cells.len());
            for c in cells {
                println!("- {c}");
            }
        }

        Commands::Normalize { ref text } => {
            let canonical = normalize(text);
            println!("Canonical: {canonical:?}");
            println!("Phonetic:  {:?}", phonetic_code(&canonical));
            println!("Trigrams:  {}", trigrams(&canonical).join(" "));
        }
    }

    Ok(())
}

/// Loads the snapshot named by `--store` (empty if missing) and the optional
/// matcher config.
fn open(args: &CliArgs) -> anyhow::Result<GeoBuckets<MemoryStore>> {
    let config = match &args.config {
        Some(path) => MatcherConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => MatcherConfig::default(),
    };
    let store = MemoryStore::load_or_default(&args.store)
        .with_context(|| format!("loading store {}", args.store.display()))?;
    Ok(GeoBuckets::with_config(store, config))
}

fn save(db: &GeoBuckets<MemoryStore>, args: &CliArgs) -> anyhow::Result<()> {
    db.store()
        .save_snapshot(&args.store)
        .with_context(|| format!("writing store {}", args.store.display()))?;
    Ok(())
}

fn print_bucket(b: &GeoBucket) {
    println!(
        "#{} {:?} at {:.6}, {:.6} (cell {}, {} members, variants: {})",
        b.id,
        b.canonical_name,
        b.centroid.lat,
        b.centroid.lng,
        b.cell_id,
        b.member_count,
        b.variants().join(" | ")
    );
}
