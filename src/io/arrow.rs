use crate::error::MercatorError;
use crate::tile::Tile;
use arrow_array::{Float64Array, RecordBatch, StringArray, UInt8Array, UInt32Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn wgs84_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4326".to_string());
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting collections of [`Tile`]s to Arrow arrays.
///
/// Implemented for `[Tile]` and `Vec<Tile>`. Geometries are lon/lat (EPSG:4326).
pub trait TilesToArrow {
    /// Converts tile centers to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts tile footprints to an Arrow PolygonArray.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts tiles to a RecordBatch with quadkey, zoom, tx, ty, lon/lat bounds and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, MercatorError>;
}

impl TilesToArrow for [Tile] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for tile in self {
            builder.push_point(Some(&tile.center.to_point()));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
        let polygons: Vec<_> = self.par_iter().map(|t: &Tile| t.to_polygon()).collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, MercatorError> {
        let polygon_array = self.to_arrow_polygons();
        let quadkeys: StringArray = self.iter().map(|t| Some(t.id.as_str())).collect();
        let zooms: UInt8Array = self.iter().map(|t| Some(t.zoom())).collect();
        let txs: UInt32Array = self.iter().map(|t| Some(t.tx())).collect();
        let tys: UInt32Array = self.iter().map(|t| Some(t.ty())).collect();
        let min_lons: Float64Array = self.iter().map(|t| Some(t.bounds.min_lon)).collect();
        let min_lats: Float64Array = self.iter().map(|t| Some(t.bounds.min_lat)).collect();
        let max_lons: Float64Array = self.iter().map(|t| Some(t.bounds.max_lon)).collect();
        let max_lats: Float64Array = self.iter().map(|t| Some(t.bounds.max_lat)).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("quadkey", DataType::Utf8, false),
            Field::new("zoom", DataType::UInt8, false),
            Field::new("tx", DataType::UInt32, false),
            Field::new("ty", DataType::UInt32, false),
            Field::new("min_lon", DataType::Float64, false),
            Field::new("min_lat", DataType::Float64, false),
            Field::new("max_lon", DataType::Float64, false),
            Field::new("max_lat", DataType::Float64, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(quadkeys),
                Arc::new(zooms),
                Arc::new(txs),
                Arc::new(tys),
                Arc::new(min_lons),
                Arc::new(min_lats),
                Arc::new(max_lons),
                Arc::new(max_lats),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| MercatorError::IoError(e.to_string()))
    }
}

impl TilesToArrow for Vec<Tile> {
    fn to_arrow_points(&self) -> PointArray {
        self.as_slice().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.as_slice().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, MercatorError> {
        self.as_slice().to_record_batch()
    }
}
