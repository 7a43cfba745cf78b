/// Tile edge length in pixels
pub const TILE_SIZE: u32 = 256;

/// Spherical Mercator Earth radius in meters (WGS84 semi-major axis)
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Latitude at which the Mercator square pyramid ends (atan(sinh(π)) in degrees)
pub const MAX_LATITUDE: f64 = 85.0511287798066;

/// Maximum zoom level for tile indices (2^30 tiles per axis)
pub const MAX_ZOOM_LEVEL: u8 = 30;

/// Upper bound on the number of tiles a single grid or line query may produce
/// (a whole-world grid at zoom 11)
pub const MAX_GRID_TILES: u64 = 1 << 22;
