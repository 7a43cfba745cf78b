use thiserror::Error;

/// Error type for mercator-tiles operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MercatorError {
    /// The quadkey contains characters outside '0'-'3' or is too long.
    #[error("Invalid quadkey: '{0}'")]
    InvalidQuadKey(String),
    /// The extent has zero width or zero height in meter space.
    #[error("Degenerate extent: width and height must both be non-zero")]
    DegenerateExtent,
    /// A projection produced infinity or NaN (e.g. latitude at a pole).
    #[error("Non-finite result: {0}")]
    NonFiniteResult(String),
    /// The zoom level is outside the valid range (0-30).
    #[error("Invalid zoom level: {0}")]
    InvalidZoomLevel(u8),
    /// The tile index does not exist at the given zoom level.
    #[error("Tile ({tx}, {ty}) is outside the pyramid at zoom {zoom}")]
    TileOutOfRange { tx: i64, ty: i64, zoom: u8 },
    /// Resolution must be positive and finite.
    #[error("Invalid resolution: {0}")]
    InvalidResolution(f64),
    /// Extent corners are inverted or not finite.
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),
    /// A size parameter is invalid (e.g., zero tile size or viewport width).
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    /// File I/O or serialization error.
    #[error("IO error: {0}")]
    IoError(String),
    /// CSV parsing or reading error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
}
