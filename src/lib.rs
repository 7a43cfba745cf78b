//! # mercator-tiles
//!
//! Conversions between WGS84 lon/lat, Spherical Mercator meters (EPSG:3857),
//! pyramid pixels and TMS / Google / QuadKey tile addresses.
//!
//! There are currently four main entry points.
//!
//! ### 1. `GlobalMercator` - Coordinate Conversions
//!
//! ```
//! use mercator_tiles::GlobalMercator;
//!
//! # fn main() -> Result<(), mercator_tiles::MercatorError> {
//! let mercator = GlobalMercator::default();
//!
//! let meters = mercator.lat_lon_to_meters(52.31, 13.24)?;
//! let pixels = mercator.meters_to_pixels(meters, 7);
//! let tile = mercator.pixels_to_tile(pixels)?;
//! assert_eq!((tile.tx(), tile.ty()), (68, 85));
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `Tile` - Single Tile Operations
//!
//! ```
//! use mercator_tiles::{GlobalMercator, Tile};
//!
//! # fn main() -> Result<(), mercator_tiles::MercatorError> {
//! let mercator = GlobalMercator::default();
//! let tile = Tile::from_quad_key(&mercator, "1202120")?;
//! println!("{} {:?}", tile.id, tile.google());
//! let polygon = tile.to_polygon();
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `TileGrid` - Collections of Tiles
//!
//! ```
//! use mercator_tiles::{BoundsGeo, TileGrid};
//! use geo_types::point;
//!
//! # fn main() -> Result<(), mercator_tiles::MercatorError> {
//! let grid = TileGrid::builder()
//!     .zoom_level(12)
//!     .geo_bounds(BoundsGeo::new(13.08, 52.33, 13.77, 52.68))
//!     .build()?;
//!
//! let pt = point! { x: 13.4, y: 52.5 };
//! if let Some(tile) = grid.get_tile_at(&pt) {
//!     println!("{}", tile.id);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 4. `CsvToTile` - CSV File Conversion
//!
//! Convert CSV files with geometry columns (WKT or GeoJSON) to tile-indexed CSVs:
//!
//! ```no_run
//! use mercator_tiles::{CsvToTile, CsvTileConfig, GeometryFormat};
//!
//! # fn main() -> Result<(), mercator_tiles::MercatorError> {
//! let config = CsvTileConfig::new("geometry", 14)
//!     .exclude(vec!["notes".into()])
//!     .with_tile_geometry(GeometryFormat::Wkt);
//!
//! "input.csv".to_tile_csv("output.csv", &config)?;
//! # Ok(())
//! # }
//! ```
//!

pub mod coord;
pub mod error;
pub mod geom;
pub mod grid;
pub mod index;
pub mod io;
pub mod mercator;
pub mod tile;

pub use coord::{Coordinate, Crs, GeoPoint, MeterPoint, PixelPoint, RasterPoint};
pub use error::MercatorError;
pub use geom::{bounds_to_polygon, fit_geometry, parse_geojson, parse_geometry, parse_wkt};
pub use grid::{TileGrid, TileGridBuilder};
pub use index::{
    BoundsGeo, BoundsMeters, EARTH_RADIUS, MAX_GRID_TILES, MAX_LATITUDE, MAX_ZOOM_LEVEL, QuadKey,
    TILE_SIZE, TileIndex, ZoomAndCenter, google_tile, quad_key, quad_key_to_tile,
};
pub use io::{
    CoordinateSource, CsvTileConfig, CsvToTile, GeometryFormat, TilesToArrow, TilesToGeoParquet,
    csv_to_tile_csv, write_geoparquet,
};
pub use mercator::{GlobalMercator, GlobalMercatorBuilder};
pub use tile::Tile;

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
pub use geoparquet;
