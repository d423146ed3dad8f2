use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for geobucket
#[derive(Debug, Parser)]
#[command(
    name = "geobucket",
    version,
    about = "Group locations into H3 buckets and match free-text location queries against them"
)]
pub struct CliArgs {
    /// Snapshot file holding the buckets (created on first write)
    #[arg(short = 's', long = "store", global = true, default_value = "geobuckets.bin")]
    pub store: PathBuf,

    /// JSON file with matcher settings (min_results, thresholds, region, ...)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output (per-layer matcher traces); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// A coordinate given on the command line.
#[derive(Debug, Args)]
pub struct LatLng {
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// File one location under its bucket and print the bucket
    Assign {
        /// Raw location name (e.g. "Sangotedo, Ajah")
        name: String,
        #[command(flatten)]
        at: LatLng,
    },

    /// Assign every record of a JSON array [{"name", "lat", "lng"}, ...],
    /// attaching one member per record
    Ingest {
        file: PathBuf,
    },

    /// Find buckets matching a location query
    Match {
        query: String,
        /// Latitude hint (needs --lng)
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude hint (needs --lat)
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Stop after a layer once this many buckets were found
        #[arg(long)]
        min_results: Option<usize>,
        /// Also run the ring-2 word-overlap layer
        #[arg(long)]
        extended: bool,
        /// Show which layer found each bucket
        #[arg(long)]
        trace: bool,
    },

    /// Print the centroid of the bucket named exactly like this
    Geocode {
        name: String,
    },

    /// Show bucket statistics
    Stats {
        /// List every bucket, most populated first
        #[arg(long)]
        details: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the H3 cell of a coordinate and its ring
    Cell {
        #[command(flatten)]
        at: LatLng,
        /// Ring radius to list
        #[arg(long, default_value_t = 1)]
        ring: u32,
    },

    /// Show how a name is normalized and keyed
    Normalize {
        text: String,
    },
}
