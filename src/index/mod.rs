pub mod constants;
mod pyramid;
mod quadkey;
mod types;

pub use constants::{EARTH_RADIUS, MAX_GRID_TILES, MAX_LATITUDE, MAX_ZOOM_LEVEL, TILE_SIZE};
pub use quadkey::{QuadKey, google_tile, quad_key, quad_key_to_tile};
pub use types::{BoundsGeo, BoundsMeters, TileIndex, ZoomAndCenter};
pub(crate) use pyramid::check_extent;
pub(crate) use types::tiles_per_side;
