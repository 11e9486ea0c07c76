//! Raw Overpass response elements.

use std::collections::BTreeMap;

use geo_types::Point;
use serde::Deserialize;

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
        }
    }
}

/// Representative center point Overpass computes for ways and relations
/// under `out center`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One element of an Overpass JSON response. Nodes carry direct
/// coordinates; ways and relations carry only a `center`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    pub osm_type: OsmType,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Decoded Overpass response body.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<RawElement>,
}

impl RawElement {
    /// Extract the element's representative point.
    ///
    /// Direct coordinates win over the computed center; an element
    /// carrying neither yields `None`.
    pub fn point(&self) -> Option<Point<f64>> {
        if let (Some(lon), Some(lat)) = (self.lon, self.lat) {
            return Some(Point::new(lon, lat));
        }
        self.center.map(|c| Point::new(c.lon, c.lat))
    }
}
