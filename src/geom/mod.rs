mod bounds;
mod fit;
mod parse;

pub use bounds::bounds_to_polygon;
pub use fit::fit_geometry;
pub use parse::{parse_geojson, parse_geometry, parse_wkt};
