// crates/geobucket-core/src/search.rs

//! # Location Matcher
//!
//! Layered search from free text (plus an optional coordinate hint) to
//! buckets. Cheap, precise layers run first; the costly fuzzy layer only runs
//! when the earlier ones did not collect `min_results` hits. A bucket returned
//! by two layers counts twice towards that threshold.
//!
//! | Layer             | Runs when                         | Keeps a bucket if                              |
//! |-------------------|-----------------------------------|------------------------------------------------|
//! | `ExactName`       | always                            | canonical name equals the query (any case)     |
//! | `SpatialName`     | coordinate given and in region    | in ring-1 and name/variant matches             |
//! | `Fuzzy`           | always (if still short)           | edit distance, trigram overlap or phonetics    |
//! | `ExtendedSpatial` | opt-in, coordinate given          | in ring-2 and shares a word with the query     |
//!
//! The result is deduplicated by bucket id and keeps first-seen order.
//! "No match" is an empty `Ok`; store failures propagate as errors.

use crate::common::{BucketId, Coord};
use crate::config::MatcherConfig;
use crate::error::Result;
use crate::model::GeoBucket;
use crate::spatial;
use crate::text::{edit_distance, normalize, phonetic_code, similarity, word_overlap};
use crate::traits::{BucketStore, LocationIndex};
use log::debug;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One stage of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLayer {
    ExactName,
    SpatialName,
    Fuzzy,
    ExtendedSpatial,
}

impl fmt::Display for MatchLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchLayer::ExactName => "exact-name",
            MatchLayer::SpatialName => "spatial-name",
            MatchLayer::Fuzzy => "fuzzy",
            MatchLayer::ExtendedSpatial => "extended-spatial",
        };
        f.write_str(s)
    }
}

/// A bucket together with the layer that first produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchHit {
    pub bucket: GeoBucket,
    pub layer: MatchLayer,
}

/// Query parameters. Unset fields fall back to the matcher's config.
#[derive(Debug, Clone, Default)]
pub struct MatchRequest<'a> {
    pub query: &'a str,
    pub near: Option<Coord>,
    pub min_results: Option<usize>,
    pub extended: Option<bool>,
}

impl<'a> MatchRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn near(mut self, lat: f64, lng: f64) -> Self {
        self.near = Some(Coord::new(lat, lng));
        self
    }

    pub fn near_opt(mut self, coord: Option<Coord>) -> Self {
        self.near = coord;
        self
    }

    pub fn min_results(mut self, n: usize) -> Self {
        self.min_results = Some(n);
        self
    }

    /// Enable or disable the ring-2 word-overlap layer for this query.
    pub fn extended(mut self, on: bool) -> Self {
        self.extended = Some(on);
        self
    }
}

/// Accumulates hits, dropping buckets already seen.
///
/// `accumulated` counts every bucket a layer returned, repeats included; the
/// early-exit threshold is checked against it, not against `hits`.
#[derive(Default)]
struct Collector {
    hits: Vec<MatchHit>,
    seen: HashSet<BucketId>,
    accumulated: usize,
}

impl Collector {
    fn extend(&mut self, layer: MatchLayer, buckets: Vec<GeoBucket>) -> usize {
        let before = self.hits.len();
        self.accumulated += buckets.len();
        for bucket in buckets {
            if self.seen.insert(bucket.id) {
                self.hits.push(MatchHit { bucket, layer });
            }
        }
        self.hits.len() - before
    }

    fn accumulated(&self) -> usize {
        self.accumulated
    }
}

/// Stateless matcher over a store handle.
#[derive(Debug, Clone)]
pub struct LocationMatcher<S> {
    store: S,
    config: MatcherConfig,
}

impl<S> LocationMatcher<S>
where
    S: BucketStore + LocationIndex,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, MatcherConfig::default())
    }

    pub fn with_config(store: S, config: MatcherConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Buckets matching `query`, optionally narrowed by a coordinate hint,
    /// using the configured `min_results`.
    pub fn search(&self, query: &str, near: Option<Coord>) -> Result<Vec<GeoBucket>> {
        self.search_with(&MatchRequest::new(query).near_opt(near))
    }

    pub fn search_with(&self, request: &MatchRequest<'_>) -> Result<Vec<GeoBucket>> {
        Ok(self
            .search_with_trace(request)?
            .into_iter()
            .map(|hit| hit.bucket)
            .collect())
    }

    /// Same inclusion rules as [`LocationMatcher::search_with`], but every
    /// bucket carries the layer that found it.
    pub fn search_with_trace(&self, request: &MatchRequest<'_>) -> Result<Vec<MatchHit>> {
        let query = normalize(request.query);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let min_results = request.min_results.unwrap_or(self.config.min_results);
        let extended = request.extended.unwrap_or(self.config.extended_spatial);
        let near = request.near.filter(|c| self.trusts(*c));

        let mut found = Collector::default();
        for layer in self.cascade(extended) {
            let buckets = match layer {
                MatchLayer::ExactName => self.exact_name_match(&query)?,
                MatchLayer::SpatialName => match near {
                    Some(coord) => self.spatial_name_match(&query, coord)?,
                    None => continue,
                },
                MatchLayer::Fuzzy => self.fuzzy_name_match(&query)?,
                MatchLayer::ExtendedSpatial => match near {
                    Some(coord) => self.extended_spatial_match(&query, coord)?,
                    None => continue,
                },
            };
            let fetched = buckets.len();
            let added = found.extend(layer, buckets);
            debug!("{layer} layer for {query:?}: {fetched} hits, {added} new");
            if found.accumulated() >= min_results {
                break;
            }
        }
        Ok(found.hits)
    }

    /// Centroid of a bucket whose canonical name equals `normalize(raw_name)`.
    ///
    /// Only looks at existing buckets; this is not a geocoder.
    pub fn geocode(&self, raw_name: &str) -> Result<Option<Coord>> {
        let name = normalize(raw_name);
        if name.is_empty() {
            return Ok(None);
        }
        Ok(self
            .store
            .find_by_exact_canonical_name(&name)?
            .first()
            .map(|b| b.centroid))
    }

    fn cascade(&self, extended: bool) -> Vec<MatchLayer> {
        let mut layers = vec![
            MatchLayer::ExactName,
            MatchLayer::SpatialName,
            MatchLayer::Fuzzy,
        ];
        if extended {
            layers.push(MatchLayer::ExtendedSpatial);
        }
        layers
    }

    /// Coordinates outside the configured region are treated as absent.
    fn trusts(&self, coord: Coord) -> bool {
        coord.is_valid() && self.config.region.contains(coord)
    }

    fn exact_name_match(&self, query: &str) -> Result<Vec<GeoBucket>> {
        self.store.find_by_exact_canonical_name(query)
    }

    fn spatial_name_match(&self, query: &str, near: Coord) -> Result<Vec<GeoBucket>> {
        let cells = spatial::ring(spatial::cell_of(near)?, 1);
        let buckets = self.store.find_by_cell_set(&cells)?;
        Ok(buckets
            .into_iter()
            .filter(|b| {
                self.is_name_match(query, &b.canonical_name)
                    || b.variant_names
                        .iter()
                        .any(|v| self.is_name_match(query, &normalize(v)))
            })
            .collect())
    }

    fn fuzzy_name_match(&self, query: &str) -> Result<Vec<GeoBucket>> {
        let all = self.store.all_buckets()?;
        let mut out: Vec<GeoBucket> = all
            .iter()
            .filter(|b| edit_distance(query, &b.canonical_name) <= self.config.max_edit_distance)
            .cloned()
            .collect();

        let mut owners: Vec<BucketId> = Vec::new();

        let prefix: String = query.chars().take(3).collect();
        for entry in self.store.find_by_trigram_prefix(&prefix)? {
            if similarity(query, &entry.canonical_name) >= self.config.acceptable_match_threshold {
                owners.push(entry.bucket);
            }
        }

        let code = phonetic_code(query);
        if !code.is_empty() {
            owners.extend(
                self.store
                    .find_by_phonetic_code(&code)?
                    .into_iter()
                    .map(|e| e.bucket),
            );
        }

        let by_id: HashMap<BucketId, &GeoBucket> = all.iter().map(|b| (b.id, b)).collect();
        for id in owners {
            match by_id.get(&id) {
                Some(b) => out.push((*b).clone()),
                // Created after the scan above; fetch it directly.
                None => out.extend(self.store.find_by_id(id)?),
            }
        }
        Ok(out)
    }

    fn extended_spatial_match(&self, query: &str, near: Coord) -> Result<Vec<GeoBucket>> {
        let cells = spatial::ring(spatial::cell_of(near)?, 2);
        let buckets = self.store.find_by_cell_set(&cells)?;
        Ok(buckets
            .into_iter()
            .filter(|b| word_overlap(query, &b.canonical_name))
            .collect())
    }

    /// Equality, containment either way, or high trigram similarity.
    fn is_name_match(&self, query: &str, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        query == name
            || name.contains(query)
            || query.contains(name)
            || similarity(query, name) >= self.config.good_match_threshold
    }
}
