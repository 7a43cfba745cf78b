pub mod arrow;
pub mod csv;
pub mod parquet;

pub use arrow::TilesToArrow;
pub use csv::{CoordinateSource, CsvTileConfig, CsvToTile, GeometryFormat, csv_to_tile_csv};
pub use parquet::{TilesToGeoParquet, write_geoparquet};
