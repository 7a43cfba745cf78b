use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
///
/// Latitude is not clamped; keep it inside ±85.0511° for lossless
/// round-trips through Spherical Mercator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns the point as `geo_types::Point` with x = longitude, y = latitude.
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// A position in Spherical Mercator meters (EPSG:3857 / EPSG:900913).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterPoint {
    pub mx: f64,
    pub my: f64,
}

impl MeterPoint {
    pub fn new(mx: f64, my: f64) -> Self {
        Self { mx, my }
    }

    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.mx, self.my)
    }
}

/// Pixel coordinates in the pyramid at `zoom`, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub px: f64,
    pub py: f64,
    pub zoom: u8,
}

impl PixelPoint {
    pub fn new(px: f64, py: f64, zoom: u8) -> Self {
        Self { px, py, zoom }
    }
}

/// Pixel coordinates with the origin moved to the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterPoint {
    pub x: f64,
    pub y: f64,
    pub zoom: u8,
}
