//! GeoPackage layer writer.

use std::path::Path;

use gdal::errors::GdalError;
use gdal::spatial_ref::SpatialRef;
use gdal::vector::{
    Feature, Geometry, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType,
};
use gdal::{Dataset, DatasetOptions, DriverManager, GdalOpenFlags};
use thiserror::Error;

use crate::models::FeatureCollection;

const GDAL_DRIVER: &str = "GPKG";

/// Failures writing the output dataset.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot open or create dataset: {0}")]
    Open(#[source] GdalError),

    #[error("layer '{0}' already exists in the dataset")]
    LayerExists(String),

    #[error("failed to write layer '{layer}': {source}")]
    Write {
        layer: String,
        #[source]
        source: GdalError,
    },
}

/// Append-only writer over a single GeoPackage container. Each area's
/// deduplicated collection becomes one point layer in EPSG:4326.
pub struct DatasetWriter {
    dataset: Dataset,
}

impl DatasetWriter {
    /// Open the container for update, creating it if it does not exist.
    pub fn create_or_open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let dataset = if path.exists() {
            Dataset::open_ex(
                path,
                DatasetOptions {
                    open_flags: GdalOpenFlags::GDAL_OF_UPDATE,
                    ..Default::default()
                },
            )
            .map_err(PersistenceError::Open)?
        } else {
            let driver =
                DriverManager::get_driver_by_name(GDAL_DRIVER).map_err(PersistenceError::Open)?;
            driver
                .create_vector_only(path)
                .map_err(PersistenceError::Open)?
        };
        Ok(Self { dataset })
    }

    /// Append `collection` as a new point layer named `name`, with one
    /// string field per schema column. Features without geometry are
    /// written with a null geometry; absent tag values become null
    /// fields.
    pub fn write_layer(
        &mut self,
        name: &str,
        collection: &FeatureCollection,
    ) -> Result<(), PersistenceError> {
        if self.dataset.layer_by_name(name).is_ok() {
            return Err(PersistenceError::LayerExists(name.to_string()));
        }
        let wrap = |source| PersistenceError::Write {
            layer: name.to_string(),
            source,
        };

        let srs = SpatialRef::from_epsg(4326).map_err(wrap)?;
        let layer = self
            .dataset
            .create_layer(LayerOptions {
                name,
                srs: Some(&srs),
                ty: OGRwkbGeometryType::wkbPoint,
                options: None,
            })
            .map_err(wrap)?;

        let fields: Vec<(&str, OGRFieldType::Type)> = collection
            .columns
            .iter()
            .map(|column| (column.as_str(), OGRFieldType::OFTString))
            .collect();
        layer.create_defn_fields(&fields).map_err(wrap)?;

        for feature in &collection.features {
            let mut record = Feature::new(layer.defn()).map_err(wrap)?;
            if feature.geometry.is_some() {
                record
                    .set_geometry(Geometry::from_wkt(&feature.wkt()).map_err(wrap)?)
                    .map_err(wrap)?;
            }
            for (column, value) in &feature.tags {
                match value {
                    Some(value) => record.set_field_string(column, value).map_err(wrap)?,
                    None => record.set_field_null(column).map_err(wrap)?,
                }
            }
            record.create(&layer).map_err(wrap)?;
        }

        Ok(())
    }
}
