use geo_types::{Coord, LineString, Polygon};

/// Builds a closed, counter-clockwise rectangle polygon from min/max corners.
pub fn bounds_to_polygon(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon<f64> {
    let coords = vec![
        Coord { x: min_x, y: min_y },
        Coord { x: max_x, y: min_y },
        Coord { x: max_x, y: max_y },
        Coord { x: min_x, y: max_y },
        Coord { x: min_x, y: min_y },
    ];
    Polygon::new(LineString::from(coords), vec![])
}
