//! Core data models for the download pipeline.

pub mod area;
pub mod element;
pub mod feature;

pub use area::{Area, AreaSelector};
pub use element::{Center, OsmType, OverpassResponse, RawElement};
pub use feature::{Feature, FeatureCollection};
