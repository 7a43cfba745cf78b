use crate::coord::{Coordinate, GeoPoint, MeterPoint};
use crate::error::MercatorError;
use crate::mercator::GlobalMercator;
use geo_types::{Coord, LineString};
use std::f64::consts::PI;

const PI_DIV_360: f64 = PI / 360.0;
const PI_DIV_180: f64 = PI / 180.0;
const PI_DIV_2: f64 = PI / 2.0;
const DEG_PER_RAD: f64 = 180.0 / PI;

impl GlobalMercator {
    /// Converts a WGS84 latitude/longitude to Spherical Mercator meters.
    ///
    /// The projection diverges at the poles. Latitudes at or beyond ±90°, NaN
    /// input and any non-finite output fail with
    /// [`MercatorError::NonFiniteResult`]. Latitudes between the pyramid edge
    /// (±85.0511°) and the poles are projected outside the square world.
    ///
    /// # Example
    /// ```
    /// use mercator_tiles::GlobalMercator;
    ///
    /// # fn main() -> Result<(), mercator_tiles::MercatorError> {
    /// let meters = GlobalMercator::default().lat_lon_to_meters(52.31, 13.24)?;
    /// assert!((meters.mx - 1473870.058102942).abs() < 1e-6);
    /// assert!((meters.my - 6856372.69101939).abs() < 1e-6);
    /// # Ok(())
    /// # }
    /// ```
    pub fn lat_lon_to_meters(&self, lat: f64, lon: f64) -> Result<MeterPoint, MercatorError> {
        if lat.is_nan() || lat.abs() >= 90.0 {
            return Err(MercatorError::NonFiniteResult(format!(
                "latitude {} is outside the Mercator domain",
                lat
            )));
        }

        let mx = lon * self.origin_shift() / 180.0;
        let my = ((90.0 + lat) * PI_DIV_360).tan().ln() / PI_DIV_180;
        let my = my * self.origin_shift() / 180.0;

        if !mx.is_finite() || !my.is_finite() {
            return Err(MercatorError::NonFiniteResult(format!(
                "projecting ({}, {}) gave ({}, {})",
                lat, lon, mx, my
            )));
        }
        Ok(MeterPoint { mx, my })
    }

    /// Converts Spherical Mercator meters back to WGS84 latitude/longitude.
    pub fn meters_to_lat_lon(&self, meters: MeterPoint) -> GeoPoint {
        let lon = meters.mx / self.origin_shift() * 180.0;
        let lat = meters.my / self.origin_shift() * 180.0;
        let lat = DEG_PER_RAD * (2.0 * (lat * PI_DIV_180).exp().atan() - PI_DIV_2);
        GeoPoint { lat, lon }
    }

    /// Projects any lon/lat [`Coordinate`] (x = longitude, y = latitude).
    pub fn wgs84_to_meters<C: Coordinate>(&self, coord: &C) -> Result<MeterPoint, MercatorError> {
        self.lat_lon_to_meters(coord.y(), coord.x())
    }

    /// Projects every vertex of a lon/lat line to Mercator meters.
    pub fn wgs84_line_to_meters(&self, line: &LineString<f64>) -> Result<LineString<f64>, MercatorError> {
        let coords = line
            .coords()
            .map(|c| {
                let m = self.lat_lon_to_meters(c.y, c.x)?;
                Ok(Coord { x: m.mx, y: m.my })
            })
            .collect::<Result<Vec<_>, MercatorError>>()?;
        Ok(LineString::new(coords))
    }
}
