//! Feature collections with a unified sparse tag schema.

use std::collections::{BTreeMap, BTreeSet};

use geo_types::Point;
use tracing::warn;

use super::element::OverpassResponse;

/// One output record: a point (when one could be extracted) plus the
/// densified tag row.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<Point<f64>>,
    /// One entry per schema column; `None` where the element lacked the tag.
    pub tags: BTreeMap<String, Option<String>>,
}

impl Feature {
    /// WKT of the geometry, used as the deduplication key.
    ///
    /// Absent geometry maps to the WKT empty point, so such rows group
    /// among themselves rather than disappearing.
    pub fn wkt(&self) -> String {
        match self.geometry {
            Some(p) => format!("POINT ({} {})", p.x(), p.y()),
            None => "POINT EMPTY".to_string(),
        }
    }
}

/// An ordered sequence of features sharing one column schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    /// Unified schema: the union of tag keys over all source elements.
    pub columns: Vec<String>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Normalize a decoded response into a feature collection.
    ///
    /// Pass one collects the union of tag keys, which becomes the
    /// schema; pass two densifies every element against it. Element
    /// order is preserved. Elements without usable coordinates are
    /// retained with absent geometry and reported.
    pub fn from_response(response: &OverpassResponse) -> Self {
        let columns: BTreeSet<String> = response
            .elements
            .iter()
            .flat_map(|element| element.tags.keys().cloned())
            .collect();

        let features = response
            .elements
            .iter()
            .map(|element| {
                let geometry = element.point();
                if geometry.is_none() {
                    warn!("no usable coordinates on element: {:?}", element);
                }
                let tags = columns
                    .iter()
                    .map(|column| (column.clone(), element.tags.get(column).cloned()))
                    .collect();
                Feature { geometry, tags }
            })
            .collect();

        Self {
            columns: columns.into_iter().collect(),
            features,
        }
    }

    /// Collapse features sharing identical geometry WKT, keeping the
    /// first of each group in original order.
    ///
    /// The output is ordered by WKT text, not by download order.
    pub fn dedupe(self) -> Self {
        let mut groups: BTreeMap<String, Feature> = BTreeMap::new();
        for feature in self.features {
            groups.entry(feature.wkt()).or_insert(feature);
        }
        Self {
            columns: self.columns,
            features: groups.into_values().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
