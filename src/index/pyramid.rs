use crate::coord::{GeoPoint, MeterPoint, PixelPoint, RasterPoint};
use crate::error::MercatorError;
use crate::index::types::{BoundsGeo, BoundsMeters, TileIndex, ZoomAndCenter, tiles_per_side};
use crate::mercator::GlobalMercator;

impl GlobalMercator {
    /// Resolution in meters per pixel at `zoom`, measured at the equator.
    pub fn resolution(&self, zoom: u8) -> f64 {
        self.initial_resolution() / 2.0_f64.powi(zoom as i32)
    }

    /// Zoom level (possibly fractional) at which a pixel covers `resolution` meters.
    ///
    /// Inverse of [`GlobalMercator::resolution`].
    pub fn zoom_for_resolution(&self, resolution: f64) -> Result<f64, MercatorError> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(MercatorError::InvalidResolution(resolution));
        }
        Ok((self.initial_resolution() / resolution).log2())
    }

    /// Converts Mercator meters to pyramid pixels at `zoom` (origin bottom-left).
    pub fn meters_to_pixels(&self, meters: MeterPoint, zoom: u8) -> PixelPoint {
        let res = self.resolution(zoom);
        PixelPoint {
            px: (meters.mx + self.origin_shift()) / res,
            py: (meters.my + self.origin_shift()) / res,
            zoom,
        }
    }

    /// Converts pyramid pixels back to Mercator meters.
    pub fn pixels_to_meters(&self, pixels: PixelPoint) -> MeterPoint {
        let res = self.resolution(pixels.zoom);
        MeterPoint {
            mx: pixels.px * res - self.origin_shift(),
            my: pixels.py * res - self.origin_shift(),
        }
    }

    /// Returns the TMS tile covering the given pixel.
    ///
    /// Uses `ceil(p / tile_size) - 1`, so a pixel lying exactly on a tile edge
    /// belongs to the tile whose upper/right edge it is: at any zoom `px = 256`
    /// is tile 0 and `px = 256.5` is tile 1. Pixels whose tile falls outside
    /// `[0, 2^zoom)` (including `px = 0`) fail with
    /// [`MercatorError::TileOutOfRange`].
    pub fn pixels_to_tile(&self, pixels: PixelPoint) -> Result<TileIndex, MercatorError> {
        if !pixels.px.is_finite() || !pixels.py.is_finite() {
            return Err(MercatorError::NonFiniteResult(format!(
                "pixel ({}, {}) has no tile",
                pixels.px, pixels.py
            )));
        }

        let tile_size = self.tile_size() as f64;
        let tx = ((pixels.px / tile_size).ceil() - 1.0).round() as i64;
        let ty = ((pixels.py / tile_size).ceil() - 1.0).round() as i64;

        let side = tiles_per_side(pixels.zoom)? as i64;
        if !(0..side).contains(&tx) || !(0..side).contains(&ty) {
            return Err(MercatorError::TileOutOfRange {
                tx,
                ty,
                zoom: pixels.zoom,
            });
        }

        Ok(TileIndex {
            tx: tx as u32,
            ty: ty as u32,
            zoom: pixels.zoom,
        })
    }

    /// Moves the pixel origin from the bottom-left to the top-left corner.
    pub fn pixels_to_raster(&self, pixels: PixelPoint) -> RasterPoint {
        let map_size = self.tile_size() as f64 * 2.0_f64.powi(pixels.zoom as i32);
        RasterPoint {
            x: pixels.px,
            y: map_size - pixels.py,
            zoom: pixels.zoom,
        }
    }

    /// Returns the TMS tile containing a WGS84 position.
    ///
    /// # Example
    /// ```
    /// use mercator_tiles::GlobalMercator;
    ///
    /// # fn main() -> Result<(), mercator_tiles::MercatorError> {
    /// let tile = GlobalMercator::default().lat_lon_to_tile(52.31, 13.24, 15)?;
    /// assert_eq!((tile.tx(), tile.ty(), tile.zoom()), (17589, 21990, 15));
    /// # Ok(())
    /// # }
    /// ```
    pub fn lat_lon_to_tile(&self, lat: f64, lon: f64, zoom: u8) -> Result<TileIndex, MercatorError> {
        let meters = self.lat_lon_to_meters(lat, lon)?;
        self.meters_to_tile(meters, zoom)
    }

    /// Returns the TMS tile containing a Mercator position.
    pub fn meters_to_tile(&self, meters: MeterPoint, zoom: u8) -> Result<TileIndex, MercatorError> {
        let pixels = self.meters_to_pixels(meters, zoom);
        self.pixels_to_tile(pixels)
    }

    /// Bounds of a TMS tile in Mercator meters.
    pub fn tile_bounds(&self, tile: TileIndex) -> BoundsMeters {
        let tile_size = self.tile_size() as f64;
        let min = self.pixels_to_meters(PixelPoint::new(
            tile.tx as f64 * tile_size,
            tile.ty as f64 * tile_size,
            tile.zoom,
        ));
        let max = self.pixels_to_meters(PixelPoint::new(
            (tile.tx as f64 + 1.0) * tile_size,
            (tile.ty as f64 + 1.0) * tile_size,
            tile.zoom,
        ));
        BoundsMeters {
            minx: min.mx,
            miny: min.my,
            maxx: max.mx,
            maxy: max.my,
        }
    }

    /// Bounds of a TMS tile in WGS84 degrees.
    pub fn tile_lat_lon_bounds(&self, tile: TileIndex) -> BoundsGeo {
        let bounds = self.tile_bounds(tile);
        let min = self.meters_to_lat_lon(MeterPoint::new(bounds.minx, bounds.miny));
        let max = self.meters_to_lat_lon(MeterPoint::new(bounds.maxx, bounds.maxy));
        BoundsGeo {
            min_lon: min.lon,
            min_lat: min.lat,
            max_lon: max.lon,
            max_lat: max.lat,
        }
    }

    /// Fractional zoom at which a meter extent exactly fits `width` x `height` pixels.
    ///
    /// The coarser of the two per-axis resolutions wins, so the whole extent is
    /// visible with a margin on the other axis. Zero-width or zero-height
    /// extents fail with [`MercatorError::DegenerateExtent`].
    pub fn zoom_for_meter_extents(
        &self,
        bounds: BoundsMeters,
        width: u32,
        height: u32,
    ) -> Result<f64, MercatorError> {
        check_viewport(width, height)?;
        check_extent(bounds.minx, bounds.miny, bounds.maxx, bounds.maxy)?;

        let dx = bounds.maxx - bounds.minx;
        let dy = bounds.maxy - bounds.miny;
        if dx == 0.0 || dy == 0.0 {
            return Err(MercatorError::DegenerateExtent);
        }

        let width_resolution = dx / width as f64;
        let height_resolution = dy / height as f64;
        self.zoom_for_resolution(width_resolution.max(height_resolution))
    }

    /// Zoom level and center that fit a WGS84 extent into a `width` x `height` viewport.
    ///
    /// # Example
    /// ```
    /// use mercator_tiles::{BoundsGeo, GlobalMercator};
    ///
    /// # fn main() -> Result<(), mercator_tiles::MercatorError> {
    /// let mercator = GlobalMercator::default();
    /// let berlin = BoundsGeo::new(13.08, 52.33, 13.77, 52.68);
    /// let fit = mercator.extent_to_zoom_and_center(berlin, 800, 600)?;
    /// assert!(fit.zoom > 9.0 && fit.zoom < 11.0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn extent_to_zoom_and_center(
        &self,
        bounds: BoundsGeo,
        width: u32,
        height: u32,
    ) -> Result<ZoomAndCenter, MercatorError> {
        check_extent(bounds.min_lon, bounds.min_lat, bounds.max_lon, bounds.max_lat)?;

        let min = self.lat_lon_to_meters(bounds.min_lat, bounds.min_lon)?;
        let max = self.lat_lon_to_meters(bounds.max_lat, bounds.max_lon)?;
        let zoom = self.zoom_for_meter_extents(
            BoundsMeters::new(min.mx, min.my, max.mx, max.my),
            width,
            height,
        )?;
        let center: GeoPoint = self.meters_to_lat_lon(MeterPoint::new(
            (min.mx + max.mx) / 2.0,
            (min.my + max.my) / 2.0,
        ));

        Ok(ZoomAndCenter { zoom, center })
    }
}

fn check_viewport(width: u32, height: u32) -> Result<(), MercatorError> {
    if width == 0 || height == 0 {
        return Err(MercatorError::InvalidDimension(format!(
            "Viewport must be at least 1x1 pixels, got {}x{}",
            width, height
        )));
    }
    Ok(())
}

pub(crate) fn check_extent(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<(), MercatorError> {
    if ![min_x, min_y, max_x, max_y].iter().all(|v| v.is_finite()) {
        return Err(MercatorError::InvalidBounds(
            "Extent corners must be finite".to_string(),
        ));
    }
    if min_x > max_x || min_y > max_y {
        return Err(MercatorError::InvalidBounds(format!(
            "min ({}, {}) exceeds max ({}, {})",
            min_x, min_y, max_x, max_y
        )));
    }
    Ok(())
}
