use crate::error::MercatorError;
use crate::index::constants::{EARTH_RADIUS, TILE_SIZE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Converter between WGS84, Spherical Mercator meters, pyramid pixels and tiles.
///
/// Holds the tile size and Earth radius together with the two values derived
/// from them, computed once at construction:
///
/// - `initial_resolution`: meters per pixel at zoom 0 (`2πR / tile_size`)
/// - `origin_shift`: half the projected world width in meters (`πR`)
///
/// The struct is `Copy` and immutable, so a single instance can be shared
/// freely across threads.
///
/// # Example
///
/// ```
/// use mercator_tiles::GlobalMercator;
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// let mercator = GlobalMercator::default();
/// let meters = mercator.lat_lon_to_meters(52.31, 13.24)?;
/// let tile = mercator.meters_to_tile(meters, 7)?;
/// assert_eq!((tile.tx(), tile.ty()), (68, 85));
///
/// let retina = GlobalMercator::builder().tile_size(512).build()?;
/// assert_eq!(retina.tile_size(), 512);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalMercator {
    tile_size: u32,
    earth_radius: f64,
    initial_resolution: f64,
    origin_shift: f64,
}

impl GlobalMercator {
    /// Standard 256 pixel tiles on the WGS84 semi-major axis.
    pub fn new() -> Self {
        Self::from_parts(TILE_SIZE, EARTH_RADIUS)
    }

    pub fn builder() -> GlobalMercatorBuilder {
        GlobalMercatorBuilder::new()
    }

    fn from_parts(tile_size: u32, earth_radius: f64) -> Self {
        let circumference = PI * 2.0 * earth_radius;
        Self {
            tile_size,
            earth_radius,
            initial_resolution: circumference / tile_size as f64,
            origin_shift: circumference / 2.0,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn earth_radius(&self) -> f64 {
        self.earth_radius
    }

    /// Meters per pixel at zoom 0, measured at the equator.
    pub fn initial_resolution(&self) -> f64 {
        self.initial_resolution
    }

    /// Half the width of the projected world in meters.
    pub fn origin_shift(&self) -> f64 {
        self.origin_shift
    }
}

impl Default for GlobalMercator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct GlobalMercatorBuilder {
    tile_size: Option<u32>,
    earth_radius: Option<f64>,
}

impl GlobalMercatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn earth_radius(mut self, earth_radius: f64) -> Self {
        self.earth_radius = Some(earth_radius);
        self
    }

    pub fn build(self) -> Result<GlobalMercator, MercatorError> {
        let tile_size = self.tile_size.unwrap_or(TILE_SIZE);
        let earth_radius = self.earth_radius.unwrap_or(EARTH_RADIUS);

        if tile_size == 0 {
            return Err(MercatorError::InvalidDimension(
                "Tile size must be positive".to_string(),
            ));
        }
        if !earth_radius.is_finite() || earth_radius <= 0.0 {
            return Err(MercatorError::InvalidDimension(format!(
                "Earth radius must be positive, got {}",
                earth_radius
            )));
        }

        Ok(GlobalMercator::from_parts(tile_size, earth_radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_derived_constants() {
        let mercator = GlobalMercator::default();

        assert_eq!(mercator.tile_size(), 256);
        assert!((mercator.origin_shift() - 20037508.342789244).abs() < 1e-6);
        assert!((mercator.initial_resolution() - 156543.03392804097).abs() < 1e-6);
    }

    #[test]
    fn test_builder_defaults_match_new() -> Result<(), MercatorError> {
        let built = GlobalMercator::builder().build()?;
        assert_eq!(built, GlobalMercator::new());
        Ok(())
    }

    #[test]
    fn test_builder_tile_size_scales_resolution() -> Result<(), MercatorError> {
        let standard = GlobalMercator::new();
        let retina = GlobalMercator::builder().tile_size(512).build()?;

        assert!((retina.initial_resolution() * 2.0 - standard.initial_resolution()).abs() < 1e-9);
        assert_eq!(retina.origin_shift(), standard.origin_shift());
        Ok(())
    }

    #[test]
    fn test_builder_rejects_zero_tile_size() {
        let result = GlobalMercator::builder().tile_size(0).build();
        assert!(matches!(result, Err(MercatorError::InvalidDimension(_))));
    }

    #[test]
    fn test_builder_rejects_bad_radius() {
        assert!(GlobalMercator::builder().earth_radius(0.0).build().is_err());
        assert!(GlobalMercator::builder().earth_radius(-1.0).build().is_err());
        assert!(GlobalMercator::builder().earth_radius(f64::NAN).build().is_err());
    }
}
