mod projection;
mod types;

pub use types::{GeoPoint, MeterPoint, PixelPoint, RasterPoint};

use geo_types::Point;

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>`, [`GeoPoint`]
/// and [`MeterPoint`]. For geographic input x is the longitude and y the
/// latitude; for projected input x and y are Mercator meters.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude or mx).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude or my).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

impl Coordinate for GeoPoint {
    fn x(&self) -> f64 {
        self.lon
    }
    fn y(&self) -> f64 {
        self.lat
    }
}

impl Coordinate for MeterPoint {
    fn x(&self) -> f64 {
        self.mx
    }
    fn y(&self) -> f64 {
        self.my
    }
}

/// Coordinate reference system for input geometry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crs {
    /// WGS84 (EPSG:4326) - longitude/latitude coordinates
    #[default]
    Wgs84,
    /// Spherical Mercator (EPSG:3857) - x/y in meters
    WebMercator,
}
