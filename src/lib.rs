//! Katapult - downloads places of worship for Paris and its urban unit
//! from the Overpass API into a multi-layer GeoPackage.
//!
//! This library provides the query, normalization, deduplication and
//! persistence building blocks used by the ingest binary.

pub mod dataset;
pub mod models;
pub mod overpass;
pub mod pipeline;

pub use models::{Area, AreaSelector, Feature, FeatureCollection, OsmType, RawElement};
