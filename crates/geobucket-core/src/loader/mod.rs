// crates/geobucket-core/src/loader/mod.rs

//! # Loader
//!
//! File I/O around the core: matcher configuration files and
//! [`crate::MemoryStore`] snapshots. The matching code itself never touches
//! the filesystem.

pub mod common_io;

#[cfg(feature = "snapshot")]
mod snapshot;

#[cfg(feature = "json")]
use crate::config::MatcherConfig;
#[cfg(feature = "json")]
use crate::error::Result;
#[cfg(feature = "json")]
use std::path::Path;

#[cfg(feature = "json")]
impl MatcherConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = common_io::open_stream(path.as_ref())?;
        let cfg: MatcherConfig = serde_json::from_reader(reader)?;
        log::info!("loaded matcher config from {}", path.as_ref().display());
        Ok(cfg)
    }
}
