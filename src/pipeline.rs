//! Sequential per-area download pipeline.
//!
//! For each configured area, in order: build the query, POST it, decode
//! the response, keep a cache copy, normalize into a feature collection,
//! deduplicate, and append the result as one dataset layer. The first
//! fatal failure aborts the run; layers already written stay persisted.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::dataset::{DatasetWriter, PersistenceError};
use crate::models::{Area, FeatureCollection, OverpassResponse};
use crate::overpass::{build_query, decode_body, QueryTransport, TransportError};

/// A fatal failure of the run, naming the area it happened in.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("area '{area}': {source}")]
    Transport {
        area: String,
        #[source]
        source: TransportError,
    },

    #[error("area '{area}': {source}")]
    Persistence {
        area: String,
        #[source]
        source: PersistenceError,
    },
}

impl IngestError {
    /// Raw response text attached to a transport failure, if any.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            IngestError::Transport {
                source: TransportError::Decode { raw_body, .. },
                ..
            } => Some(raw_body),
            _ => None,
        }
    }
}

/// Run the full download for each area, strictly sequentially: the next
/// area's request is not issued until the previous area is written.
pub fn run<T: QueryTransport>(
    areas: &[Area],
    transport: &T,
    writer: &mut DatasetWriter,
    cache_dir: &Path,
) -> Result<(), IngestError> {
    for area in areas {
        let query = build_query(&area.selector);

        info!("Querying Overpass for area '{}'", area.name);
        let body = transport
            .post_query(&query)
            .map_err(|source| IngestError::Transport {
                area: area.name.clone(),
                source,
            })?;

        let value = decode_body(&body).map_err(|source| IngestError::Transport {
            area: area.name.clone(),
            source,
        })?;

        // Cache copy of the decoded response, for diagnosis after the
        // fact. Never read back; failing to write it does not abort.
        let cache_path = cache_dir.join(format!("{}.json", area.name));
        if let Err(err) = fs::write(&cache_path, value.to_string()) {
            warn!(
                "could not write cache copy to {}: {}",
                cache_path.display(),
                err
            );
        }

        let response: OverpassResponse =
            serde_json::from_value(value).map_err(|source| IngestError::Transport {
                area: area.name.clone(),
                source: TransportError::Decode {
                    source,
                    raw_body: body,
                },
            })?;
        info!("Area '{}': {} elements", area.name, response.elements.len());

        let collection = FeatureCollection::from_response(&response).dedupe();
        info!(
            "Area '{}': {} features after deduplication",
            area.name,
            collection.len()
        );

        writer
            .write_layer(&area.name, &collection)
            .map_err(|source| IngestError::Persistence {
                area: area.name.clone(),
                source,
            })?;
        info!("Wrote layer '{}'", area.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::AreaSelector;

    /// Replays canned response bodies, one per call.
    struct QueuedTransport(RefCell<Vec<String>>);

    impl QueuedTransport {
        fn new(bodies: &[&str]) -> Self {
            Self(RefCell::new(bodies.iter().map(|b| b.to_string()).collect()))
        }
    }

    impl QueryTransport for QueuedTransport {
        fn post_query(&self, _query: &str) -> Result<String, TransportError> {
            Ok(self.0.borrow_mut().remove(0))
        }
    }

    const NODE_RESPONSE: &str = r#"{"elements":[{"type":"node","id":1,"lat":48.85,"lon":2.35,"tags":{"amenity":"place_of_worship","name":"A"}}]}"#;

    fn areas() -> Vec<Area> {
        vec![
            Area::new("Paris", AreaSelector::Iso("FR-75".to_string())),
            Area::new("UniteUrbaine", AreaSelector::Insee(vec!["92002".to_string()])),
        ]
    }

    #[test]
    fn test_run_writes_one_layer_per_area() {
        let dir = tempfile::tempdir().unwrap();
        let gpkg = dir.path().join("out.gpkg");
        let mut writer = DatasetWriter::create_or_open(&gpkg).unwrap();
        let transport = QueuedTransport::new(&[NODE_RESPONSE, NODE_RESPONSE]);

        run(&areas(), &transport, &mut writer, dir.path()).unwrap();
        drop(writer);

        let dataset = gdal::Dataset::open(&gpkg).unwrap();
        assert_eq!(dataset.layer_count(), 2);
        assert!(dataset.layer_by_name("Paris").is_ok());
        assert!(dataset.layer_by_name("UniteUrbaine").is_ok());
    }

    #[test]
    fn test_run_writes_cache_copies() {
        let dir = tempfile::tempdir().unwrap();
        let gpkg = dir.path().join("out.gpkg");
        let mut writer = DatasetWriter::create_or_open(&gpkg).unwrap();
        let transport = QueuedTransport::new(&[NODE_RESPONSE, NODE_RESPONSE]);

        run(&areas(), &transport, &mut writer, dir.path()).unwrap();

        let cached = fs::read_to_string(dir.path().join("Paris.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&cached).unwrap();
        assert_eq!(value["elements"].as_array().unwrap().len(), 1);
        assert!(dir.path().join("UniteUrbaine.json").exists());
    }

    #[test]
    fn test_failed_second_area_keeps_first_layer() {
        let dir = tempfile::tempdir().unwrap();
        let gpkg = dir.path().join("out.gpkg");
        let mut writer = DatasetWriter::create_or_open(&gpkg).unwrap();
        let transport =
            QueuedTransport::new(&[NODE_RESPONSE, "<html>rate limited</html>"]);

        let err = run(&areas(), &transport, &mut writer, dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::Transport { .. }));
        assert_eq!(err.raw_body(), Some("<html>rate limited</html>"));
        drop(writer);

        let dataset = gdal::Dataset::open(&gpkg).unwrap();
        assert_eq!(dataset.layer_count(), 1);
        assert!(dataset.layer_by_name("Paris").is_ok());
    }

    #[test]
    fn test_structurally_wrong_json_is_a_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let gpkg = dir.path().join("out.gpkg");
        let mut writer = DatasetWriter::create_or_open(&gpkg).unwrap();
        // Valid JSON, but not an Overpass response.
        let transport = QueuedTransport::new(&[r#"{"error":"too busy"}"#]);

        let err = run(
            &areas()[..1],
            &transport,
            &mut writer,
            dir.path(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Transport { .. }));
        assert_eq!(err.raw_body(), Some(r#"{"error":"too busy"}"#));
    }
}
