use crate::error::MercatorError;
use crate::index::{BoundsGeo, ZoomAndCenter};
use crate::mercator::GlobalMercator;
use geo::BoundingRect;
use geo_types::Geometry;

/// Fits the bounding box of a lon/lat geometry into a `width` x `height` viewport.
///
/// # Example
/// ```
/// use mercator_tiles::{GlobalMercator, fit_geometry, parse_geometry};
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// let route = parse_geometry("LINESTRING(13.08 52.33, 13.77 52.68)")?;
/// let fit = fit_geometry(&GlobalMercator::default(), &route, 800, 600)?;
/// assert!(fit.zoom > 9.0 && fit.zoom < 11.0);
/// # Ok(())
/// # }
/// ```
pub fn fit_geometry(
    mercator: &GlobalMercator,
    geom: &Geometry<f64>,
    width: u32,
    height: u32,
) -> Result<ZoomAndCenter, MercatorError> {
    let rect = geom
        .bounding_rect()
        .ok_or_else(|| MercatorError::InvalidBounds("Geometry is empty".to_string()))?;
    mercator.extent_to_zoom_and_center(BoundsGeo::from_rect(&rect), width, height)
}
