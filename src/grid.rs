use crate::coord::Coordinate;
use crate::error::MercatorError;
use crate::index::{
    BoundsGeo, BoundsMeters, MAX_GRID_TILES, MAX_LATITUDE, TileIndex, check_extent,
    tiles_per_side,
};
use crate::mercator::GlobalMercator;
use crate::tile::Tile;
use geo_types::Polygon;
use tracing::debug;

/// Every TMS tile at one zoom level whose footprint touches an extent.
///
/// # Example
///
/// ```
/// use mercator_tiles::{BoundsGeo, TileGrid};
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// let grid = TileGrid::builder()
///     .zoom_level(10)
///     .geo_bounds(BoundsGeo::new(13.08, 52.33, 13.77, 52.68))
///     .build()?;
///
/// assert_eq!(grid.len(), 6);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    zoom_level: u8,
    mercator: GlobalMercator,
}

impl TileGrid {
    pub fn builder() -> TileGridBuilder {
        TileGridBuilder::new()
    }

    /// Tiles covering an extent in Mercator meters.
    ///
    /// Corners beyond the edge of the world are clamped to the outermost tiles.
    pub fn from_meter_bounds(
        mercator: &GlobalMercator,
        bounds: BoundsMeters,
        zoom_level: u8,
    ) -> Result<Self, MercatorError> {
        check_extent(bounds.minx, bounds.miny, bounds.maxx, bounds.maxy)?;
        let tiles = generate_tiles_for_extent(mercator, bounds, zoom_level)?;

        Ok(Self {
            tiles,
            zoom_level,
            mercator: *mercator,
        })
    }

    /// Tiles covering an extent in WGS84 degrees.
    ///
    /// Latitudes are clamped to `±MAX_LATITUDE` before projecting.
    pub fn from_geo_bounds(
        mercator: &GlobalMercator,
        bounds: BoundsGeo,
        zoom_level: u8,
    ) -> Result<Self, MercatorError> {
        check_extent(bounds.min_lon, bounds.min_lat, bounds.max_lon, bounds.max_lat)?;

        let min = mercator.lat_lon_to_meters(
            bounds.min_lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            bounds.min_lon,
        )?;
        let max = mercator.lat_lon_to_meters(
            bounds.max_lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            bounds.max_lon,
        )?;

        Self::from_meter_bounds(
            mercator,
            BoundsMeters::new(min.mx, min.my, max.mx, max.my),
            zoom_level,
        )
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom_level
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// The grid tile containing a lon/lat coordinate, if any.
    pub fn get_tile_at(&self, coord: &impl Coordinate) -> Option<&Tile> {
        let meters = self.mercator.wgs84_to_meters(coord).ok()?;
        let index = self.mercator.meters_to_tile(meters, self.zoom_level).ok()?;
        self.tiles.iter().find(|tile| tile.index == index)
    }

    /// WGS84 footprints of all tiles.
    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.tiles.iter().map(|tile| tile.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&Tile>
    where
        F: Fn(&Tile) -> bool,
    {
        self.tiles.iter().filter(|tile| predicate(tile)).collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Extent {
    Geo(BoundsGeo),
    Meters(BoundsMeters),
}

#[derive(Debug, Default)]
pub struct TileGridBuilder {
    zoom_level: Option<u8>,
    extent: Option<Extent>,
    mercator: Option<GlobalMercator>,
}

impl TileGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom_level(mut self, zoom_level: u8) -> Self {
        self.zoom_level = Some(zoom_level);
        self
    }

    pub fn geo_bounds(mut self, bounds: BoundsGeo) -> Self {
        self.extent = Some(Extent::Geo(bounds));
        self
    }

    pub fn meter_bounds(mut self, bounds: BoundsMeters) -> Self {
        self.extent = Some(Extent::Meters(bounds));
        self
    }

    /// Converter to use; defaults to 256 px tiles on the WGS84 sphere.
    pub fn mercator(mut self, mercator: GlobalMercator) -> Self {
        self.mercator = Some(mercator);
        self
    }

    pub fn build(self) -> Result<TileGrid, MercatorError> {
        let zoom_level = self
            .zoom_level
            .ok_or_else(|| MercatorError::InvalidDimension("zoom_level must be set".to_string()))?;
        let extent = self
            .extent
            .ok_or_else(|| MercatorError::InvalidBounds("extent must be set".to_string()))?;
        let mercator = self.mercator.unwrap_or_default();

        match extent {
            Extent::Geo(bounds) => TileGrid::from_geo_bounds(&mercator, bounds, zoom_level),
            Extent::Meters(bounds) => TileGrid::from_meter_bounds(&mercator, bounds, zoom_level),
        }
    }
}

// Pixel-to-tile ratios within this relative distance of a whole number are
// treated as lying on the tile edge.
const EDGE_TOLERANCE: f64 = 1e-12;

fn snap_to_edge(ratio: f64) -> f64 {
    let edge = ratio.round();
    if (ratio - edge).abs() <= EDGE_TOLERANCE * ratio.abs().max(1.0) {
        edge
    } else {
        ratio
    }
}

fn generate_tiles_for_extent(
    mercator: &GlobalMercator,
    bounds: BoundsMeters,
    zoom_level: u8,
) -> Result<Vec<Tile>, MercatorError> {
    let last = (tiles_per_side(zoom_level)? - 1) as f64;
    let tile_size = mercator.tile_size() as f64;
    let res = mercator.resolution(zoom_level);

    let ratio = |meters: f64| snap_to_edge((meters + mercator.origin_shift()) / res / tile_size);
    let clamp = |t: f64| t.clamp(0.0, last) as u32;

    // An edge shared with a neighbour belongs to the extent's side only: the
    // low corner floors, the high corner uses the ceiling rule.
    let axis = |min: f64, max: f64| {
        let high = clamp(ratio(max).ceil() - 1.0);
        let low = clamp(ratio(min).floor()).min(high);
        (low, high)
    };
    let (min_tx, max_tx) = axis(bounds.minx, bounds.maxx);
    let (min_ty, max_ty) = axis(bounds.miny, bounds.maxy);

    let count = u64::from(max_tx - min_tx + 1) * u64::from(max_ty - min_ty + 1);
    if count > MAX_GRID_TILES {
        return Err(MercatorError::InvalidDimension(format!(
            "Grid of {} tiles at zoom {} exceeds the limit of {}",
            count, zoom_level, MAX_GRID_TILES
        )));
    }

    let mut tiles = Vec::with_capacity(count as usize);
    for ty in min_ty..=max_ty {
        for tx in min_tx..=max_tx {
            let index = TileIndex::new(tx, ty, zoom_level)?;
            tiles.push(Tile::from_index(mercator, index));
        }
    }

    debug!(
        zoom = zoom_level,
        tx = ?(min_tx, max_tx),
        ty = ?(min_ty, max_ty),
        count = tiles.len(),
        "Generated tile grid"
    );

    Ok(tiles)
}
