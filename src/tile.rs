use crate::coord::{Coordinate, Crs, GeoPoint, MeterPoint};
use crate::error::MercatorError;
use crate::index::{
    BoundsGeo, BoundsMeters, MAX_GRID_TILES, TileIndex, google_tile, quad_key, quad_key_to_tile,
};
use crate::io::arrow::TilesToArrow;
use crate::io::parquet::TilesToGeoParquet;
use crate::mercator::GlobalMercator;
use arrow_array::RecordBatch;
use geo::Centroid;
use geo_types::{Geometry, LineString, Polygon};
use geoarrow_array::array::{PointArray, PolygonArray};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Upper bound on the samples taken along one line, four per tile of the
/// largest allowed grid.
const MAX_LINE_SAMPLES: u64 = 4 * MAX_GRID_TILES;

/// A single tile of the Spherical Mercator pyramid.
///
/// Each `Tile` carries its quadkey, its TMS index and its footprint, so it
/// can be written out or drawn without going back to the converter.
///
/// # Example
///
/// ```
/// use mercator_tiles::{GlobalMercator, Tile};
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// let mercator = GlobalMercator::default();
/// let tile = Tile::from_wgs84(&mercator, &(13.24, 52.31), 7)?;
/// assert_eq!(tile.id, "1202120");
/// assert_eq!((tile.tx(), tile.ty()), (68, 85));
///
/// // Footprint polygon in lon/lat, ready for GeoJSON or WKT
/// let polygon = tile.to_polygon();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Quadkey of the tile (empty at zoom 0)
    pub id: String,
    /// TMS index (origin bottom-left)
    pub index: TileIndex,
    /// Footprint in WGS84 degrees
    pub bounds: BoundsGeo,
    /// Footprint in Mercator meters
    pub meter_bounds: BoundsMeters,
    /// Geographic position of the tile's Mercator midpoint
    pub center: GeoPoint,
}

impl Tile {
    /// Builds the tile for an already validated index.
    pub fn from_index(mercator: &GlobalMercator, index: TileIndex) -> Self {
        let meter_bounds = mercator.tile_bounds(index);
        let bounds = mercator.tile_lat_lon_bounds(index);
        let center = mercator.meters_to_lat_lon(MeterPoint::new(
            (meter_bounds.minx + meter_bounds.maxx) / 2.0,
            (meter_bounds.miny + meter_bounds.maxy) / 2.0,
        ));

        Self {
            id: quad_key(index),
            index,
            bounds,
            meter_bounds,
            center,
        }
    }

    /// Create a Tile from its quadkey.
    ///
    /// # Example
    /// ```
    /// use mercator_tiles::{GlobalMercator, Tile};
    ///
    /// # fn main() -> Result<(), mercator_tiles::MercatorError> {
    /// let mercator = GlobalMercator::default();
    /// let tile = Tile::from_quad_key(&mercator, "120212010132103")?;
    /// assert_eq!((tile.tx(), tile.ty(), tile.zoom()), (17589, 21990, 15));
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_quad_key(mercator: &GlobalMercator, key: &str) -> Result<Self, MercatorError> {
        let index = quad_key_to_tile(key)?;
        Ok(Self::from_index(mercator, index))
    }

    /// Create a Tile from Google/XYZ indices (row origin top-left).
    pub fn from_google(
        mercator: &GlobalMercator,
        x: u32,
        y: u32,
        zoom: u8,
    ) -> Result<Self, MercatorError> {
        let google = TileIndex::new(x, y, zoom)?;
        Ok(Self::from_index(mercator, google_tile(google)))
    }

    /// Create the Tile containing a lon/lat coordinate.
    pub fn from_wgs84(
        mercator: &GlobalMercator,
        coord: &impl Coordinate,
        zoom: u8,
    ) -> Result<Self, MercatorError> {
        let meters = mercator.wgs84_to_meters(coord)?;
        Self::from_meters(mercator, &meters, zoom)
    }

    /// Create the Tile containing a Mercator coordinate in meters.
    pub fn from_meters(
        mercator: &GlobalMercator,
        coord: &impl Coordinate,
        zoom: u8,
    ) -> Result<Self, MercatorError> {
        let index = mercator.meters_to_tile(MeterPoint::new(coord.x(), coord.y()), zoom)?;
        Ok(Self::from_index(mercator, index))
    }

    /// Create Tiles along a LineString in Mercator meters.
    ///
    /// Samples the line at quarter-tile steps and returns each crossed tile once,
    /// in the order the line first enters it.
    pub fn from_line_string_meters(
        mercator: &GlobalMercator,
        line: &LineString<f64>,
        zoom: u8,
    ) -> Result<Vec<Self>, MercatorError> {
        let tile_width = mercator.resolution(zoom) * mercator.tile_size() as f64;
        let step_size = tile_width * 0.25;

        let mut seen: HashSet<TileIndex> = HashSet::new();
        let mut tiles = Vec::new();
        let mut samples: u64 = 0;

        if line.0.len() == 1 {
            return Ok(vec![Self::from_meters(mercator, &line.0[0].x_y(), zoom)?]);
        }

        for window in line.0.windows(2) {
            let start = &window[0];
            let end = &window[1];

            let dx = end.x - start.x;
            let dy = end.y - start.y;
            let segment_length = (dx * dx + dy * dy).sqrt();
            let steps = (segment_length / step_size).ceil();
            if steps > MAX_LINE_SAMPLES.saturating_sub(samples) as f64 {
                return Err(MercatorError::InvalidDimension(format!(
                    "Line needs more than {} samples at zoom {}",
                    MAX_LINE_SAMPLES, zoom
                )));
            }
            // NaN casts to 0 and is reported by `meters_to_tile`
            let steps = steps as usize;
            samples += steps as u64 + 1;

            for i in 0..=steps {
                let t = if steps == 0 {
                    0.0
                } else {
                    i as f64 / steps as f64
                };
                let meters = MeterPoint::new(start.x + t * dx, start.y + t * dy);
                let index = mercator.meters_to_tile(meters, zoom)?;

                if seen.insert(index) {
                    tiles.push(Self::from_index(mercator, index));
                }
            }
        }

        Ok(tiles)
    }

    /// Create Tiles along a LineString in lon/lat.
    ///
    /// The line is projected first, so sampling follows the straight Mercator
    /// segment between vertices.
    pub fn from_line_string_wgs84(
        mercator: &GlobalMercator,
        line: &LineString<f64>,
        zoom: u8,
    ) -> Result<Vec<Self>, MercatorError> {
        let projected = mercator.wgs84_line_to_meters(line)?;
        Self::from_line_string_meters(mercator, &projected, zoom)
    }

    /// Create Tiles from an arbitrary `geo_types::Geometry`.
    ///
    /// Points produce their tile, lines every tile they cross, and polygons
    /// the tile of their centroid. Collections are flattened.
    pub fn from_geometry(
        mercator: &GlobalMercator,
        geom: Geometry<f64>,
        zoom: u8,
        crs: Crs,
    ) -> Result<Vec<Self>, MercatorError> {
        let point_tile = |x: f64, y: f64| match crs {
            Crs::Wgs84 => Self::from_wgs84(mercator, &(x, y), zoom),
            Crs::WebMercator => Self::from_meters(mercator, &(x, y), zoom),
        };
        let line_tiles = |line: &LineString<f64>| match crs {
            Crs::Wgs84 => Self::from_line_string_wgs84(mercator, line, zoom),
            Crs::WebMercator => Self::from_line_string_meters(mercator, line, zoom),
        };

        match geom {
            Geometry::Point(pt) => Ok(vec![point_tile(pt.x(), pt.y())?]),
            Geometry::MultiPoint(mp) => mp.0.iter().map(|pt| point_tile(pt.x(), pt.y())).collect(),
            Geometry::LineString(line) => line_tiles(&line),
            Geometry::MultiLineString(mls) => {
                let mut seen = HashSet::new();
                let mut all_tiles = Vec::new();
                for line in &mls.0 {
                    for tile in line_tiles(line)? {
                        if seen.insert(tile.index) {
                            all_tiles.push(tile);
                        }
                    }
                }
                Ok(all_tiles)
            }
            Geometry::Polygon(poly) => match poly.centroid() {
                Some(c) => Ok(vec![point_tile(c.x(), c.y())?]),
                None => {
                    warn!("Polygon has no centroid, skipping");
                    Ok(vec![])
                }
            },
            Geometry::MultiPolygon(mp) => {
                let mut tiles = Vec::new();
                for poly in &mp.0 {
                    if let Some(c) = poly.centroid() {
                        tiles.push(point_tile(c.x(), c.y())?);
                    }
                }
                Ok(tiles)
            }
            Geometry::GeometryCollection(gc) => {
                let mut all_tiles = Vec::new();
                for g in gc.0 {
                    all_tiles.extend(Self::from_geometry(mercator, g, zoom, crs)?);
                }
                Ok(all_tiles)
            }
            _ => Err(MercatorError::GeometryParseError(
                "Unsupported geometry type".to_string(),
            )),
        }
    }

    pub fn tx(&self) -> u32 {
        self.index.tx()
    }

    pub fn ty(&self) -> u32 {
        self.index.ty()
    }

    pub fn zoom(&self) -> u8 {
        self.index.zoom()
    }

    pub fn bounds(&self) -> BoundsGeo {
        self.bounds
    }

    pub fn meter_bounds(&self) -> BoundsMeters {
        self.meter_bounds
    }

    /// Google/XYZ index of this tile (row origin top-left).
    pub fn google(&self) -> TileIndex {
        google_tile(self.index)
    }

    /// Footprint polygon in WGS84 degrees.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds.to_polygon()
    }

    /// Footprint polygon in Mercator meters.
    pub fn to_mercator_polygon(&self) -> Polygon<f64> {
        self.meter_bounds.to_polygon()
    }

    /// Converts this tile's center to an Arrow PointArray.
    pub fn to_arrow_points(&self) -> PointArray {
        std::slice::from_ref(self).to_arrow_points()
    }

    /// Converts this tile to an Arrow PolygonArray.
    pub fn to_arrow_polygons(&self) -> PolygonArray {
        std::slice::from_ref(self).to_arrow_polygons()
    }

    /// Converts this tile to an Arrow RecordBatch with all attributes.
    pub fn to_record_batch(&self) -> Result<RecordBatch, MercatorError> {
        std::slice::from_ref(self).to_record_batch()
    }

    /// Writes this tile to a GeoParquet file.
    pub fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercatorError> {
        std::slice::from_ref(self).to_geoparquet(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Point, polygon};

    #[test]
    fn test_from_wgs84_tuple() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let tile = Tile::from_wgs84(&mercator, &(13.24, 52.31), 15)?;

        assert_eq!(tile.id, "120212010132103");
        assert_eq!((tile.tx(), tile.ty(), tile.zoom()), (17589, 21990, 15));
        assert_eq!(tile.google().ty(), 10777);
        Ok(())
    }

    #[test]
    fn test_tuple_and_point_same_result() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let from_tuple = Tile::from_wgs84(&mercator, &(13.24, 52.31), 11)?;
        let from_point = Tile::from_wgs84(&mercator, &Point::new(13.24, 52.31), 11)?;

        assert_eq!(from_tuple, from_point);
        Ok(())
    }

    #[test]
    fn test_from_meters_matches_from_wgs84() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let direct = Tile::from_meters(&mercator, &(1473870.058102942, 6856372.69101939), 7)?;
        let via_geo = Tile::from_wgs84(&mercator, &(13.24, 52.31), 7)?;

        assert_eq!(direct.id, via_geo.id);
        Ok(())
    }

    #[test]
    fn test_all_constructors_agree() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let by_index = Tile::from_index(&mercator, TileIndex::new(1099, 1374, 11)?);
        let by_key = Tile::from_quad_key(&mercator, "12021201013")?;
        let by_google = Tile::from_google(&mercator, 1099, 673, 11)?;

        assert_eq!(by_index, by_key);
        assert_eq!(by_index, by_google);
        Ok(())
    }

    #[test]
    fn test_bounds_contain_center_and_source_point() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let tile = Tile::from_wgs84(&mercator, &(13.24, 52.31), 11)?;

        assert!(tile.bounds.contains(&tile.center));
        assert!(tile.bounds.contains(&GeoPoint::new(52.31, 13.24)));
        assert!((tile.bounds.min_lon - 13.183593750000007).abs() < 1e-9);
        assert!((tile.bounds.max_lat - 52.3755991766591).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_polygons() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let tile = Tile::from_quad_key(&mercator, "1")?;

        let polygon = tile.to_polygon();
        assert_eq!(polygon.exterior().coords().count(), 5);
        assert!((polygon.exterior().0[2].x - 180.0).abs() < 1e-9);

        let mercator_polygon = tile.to_mercator_polygon();
        assert!((mercator_polygon.exterior().0[2].x - mercator.origin_shift()).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_invalid_inputs() {
        let mercator = GlobalMercator::default();

        assert!(matches!(
            Tile::from_quad_key(&mercator, "12x"),
            Err(MercatorError::InvalidQuadKey(_))
        ));
        assert!(matches!(
            Tile::from_google(&mercator, 0, 2, 1),
            Err(MercatorError::TileOutOfRange { .. })
        ));
        assert!(matches!(
            Tile::from_wgs84(&mercator, &(0.0, 90.0), 3),
            Err(MercatorError::NonFiniteResult(_))
        ));
    }

    #[test]
    fn test_from_line_string_wgs84() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let line = LineString::from(vec![(13.1, 52.3), (13.7, 52.6)]);
        let tiles = Tile::from_line_string_wgs84(&mercator, &line, 12)?;

        assert!(tiles.len() > 1);
        let first = Tile::from_wgs84(&mercator, &(13.1, 52.3), 12)?;
        let last = Tile::from_wgs84(&mercator, &(13.7, 52.6), 12)?;
        assert_eq!(tiles[0], first);
        assert!(tiles.contains(&last));

        let unique: HashSet<TileIndex> = tiles.iter().map(|t| t.index).collect();
        assert_eq!(unique.len(), tiles.len());
        Ok(())
    }

    #[test]
    fn test_line_tiles_are_connected() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let line = LineString::from(vec![(13.1, 52.3), (13.7, 52.3)]);
        let tiles = Tile::from_line_string_wgs84(&mercator, &line, 10)?;

        for pair in tiles.windows(2) {
            let dx = pair[0].tx().abs_diff(pair[1].tx());
            let dy = pair[0].ty().abs_diff(pair[1].ty());
            assert!(dx <= 1 && dy <= 1);
        }
        Ok(())
    }

    #[test]
    fn test_line_sample_count_is_capped() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let across = LineString::from(vec![(-2.0e7, 0.0), (2.0e7, 0.0)]);

        assert!(matches!(
            Tile::from_line_string_meters(&mercator, &across, 30),
            Err(MercatorError::InvalidDimension(_))
        ));

        let tiles = Tile::from_line_string_meters(&mercator, &across, 8)?;
        assert_eq!(tiles.len(), 256);
        Ok(())
    }

    #[test]
    fn test_from_geometry_point_matches_from_wgs84() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let direct = Tile::from_wgs84(&mercator, &(13.24, 52.31), 9)?;
        let via_geom = Tile::from_geometry(
            &mercator,
            Geometry::Point(Point::new(13.24, 52.31)),
            9,
            Crs::Wgs84,
        )?;

        assert_eq!(via_geom, vec![direct]);
        Ok(())
    }

    #[test]
    fn test_from_geometry_point_web_mercator() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let tiles = Tile::from_geometry(
            &mercator,
            Geometry::Point(Point::new(1473870.058102942, 6856372.69101939)),
            7,
            Crs::WebMercator,
        )?;

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].id, "1202120");
        Ok(())
    }

    #[test]
    fn test_from_geometry_polygon_uses_centroid() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();
        let poly = polygon![
            (x: 13.0, y: 52.0),
            (x: 14.0, y: 52.0),
            (x: 14.0, y: 53.0),
            (x: 13.0, y: 53.0),
            (x: 13.0, y: 52.0),
        ];
        let tiles = Tile::from_geometry(&mercator, Geometry::Polygon(poly), 10, Crs::Wgs84)?;

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0], Tile::from_wgs84(&mercator, &(13.5, 52.5), 10)?);
        Ok(())
    }

    #[test]
    fn test_from_geometry_multi_and_collections() -> Result<(), MercatorError> {
        let mercator = GlobalMercator::default();

        let mp = MultiPoint::new(vec![Point::new(13.24, 52.31), Point::new(-0.1, 51.5)]);
        let tiles = Tile::from_geometry(&mercator, Geometry::MultiPoint(mp), 8, Crs::Wgs84)?;
        assert_eq!(tiles.len(), 2);

        let mls = MultiLineString::new(vec![
            LineString::from(vec![(13.1, 52.3), (13.2, 52.4)]),
            LineString::from(vec![(13.2, 52.4), (13.1, 52.3)]),
        ]);
        let tiles = Tile::from_geometry(&mercator, Geometry::MultiLineString(mls), 12, Crs::Wgs84)?;
        let unique: HashSet<TileIndex> = tiles.iter().map(|t| t.index).collect();
        assert_eq!(unique.len(), tiles.len());

        let mpoly = MultiPolygon::new(vec![
            polygon![(x: 13.0, y: 52.0), (x: 14.0, y: 52.0), (x: 14.0, y: 53.0), (x: 13.0, y: 52.0)],
            polygon![(x: -1.0, y: 51.0), (x: 0.0, y: 51.0), (x: 0.0, y: 52.0), (x: -1.0, y: 51.0)],
        ]);
        let tiles = Tile::from_geometry(&mercator, Geometry::MultiPolygon(mpoly), 6, Crs::Wgs84)?;
        assert_eq!(tiles.len(), 2);

        let gc = GeometryCollection::new_from(vec![
            Geometry::Point(Point::new(13.24, 52.31)),
            Geometry::Point(Point::new(-0.1, 51.5)),
        ]);
        let tiles = Tile::from_geometry(&mercator, Geometry::GeometryCollection(gc), 8, Crs::Wgs84)?;
        assert_eq!(tiles.len(), 2);
        Ok(())
    }

    #[test]
    fn test_serde_roundtrip() -> Result<(), MercatorError> {
        let tile = Tile::from_quad_key(&GlobalMercator::default(), "1202120")?;
        let json = serde_json::to_string(&tile).map_err(|e| MercatorError::IoError(e.to_string()))?;
        let back: Tile =
            serde_json::from_str(&json).map_err(|e| MercatorError::IoError(e.to_string()))?;

        assert_eq!(back, tile);
        assert!(json.contains("\"id\":\"1202120\""));
        Ok(())
    }
}
