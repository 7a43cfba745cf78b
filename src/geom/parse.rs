use crate::error::MercatorError;
use geo_types::{Geometry, GeometryCollection};
use geojson::GeoJson;
use std::str::FromStr;
use wkt::Wkt;

/// Parses a geometry string, auto-detecting WKT or GeoJSON format.
///
/// A leading `{` selects GeoJSON; anything else is read as WKT.
/// Feature collections are flattened into a `GeometryCollection`.
pub fn parse_geometry(s: &str) -> Result<Geometry<f64>, MercatorError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(MercatorError::GeometryParseError(
            "Empty geometry string".to_string(),
        ));
    }
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

fn parse_err(e: impl ToString) -> MercatorError {
    MercatorError::GeometryParseError(e.to_string())
}

/// Parses a GeoJSON geometry, feature or feature collection.
pub fn parse_geojson(s: &str) -> Result<Geometry<f64>, MercatorError> {
    let geojson: GeoJson = s.parse().map_err(|e: geojson::Error| parse_err(e))?;

    match geojson {
        GeoJson::Geometry(geom) => Geometry::try_from(geom).map_err(parse_err),
        GeoJson::Feature(feature) => {
            let geom = feature
                .geometry
                .ok_or_else(|| parse_err("Feature has no geometry"))?;
            Geometry::try_from(geom).map_err(parse_err)
        }
        GeoJson::FeatureCollection(collection) => {
            let geoms = collection
                .features
                .into_iter()
                .filter_map(|f| f.geometry)
                .map(|g| Geometry::try_from(g).map_err(parse_err))
                .collect::<Result<Vec<Geometry<f64>>, _>>()?;
            Ok(Geometry::GeometryCollection(GeometryCollection::new_from(geoms)))
        }
    }
}

/// Parses a WKT string.
pub fn parse_wkt(s: &str) -> Result<Geometry<f64>, MercatorError> {
    let wkt: Wkt<f64> = Wkt::from_str(s).map_err(parse_err)?;

    wkt.try_into().map_err(|_| {
        MercatorError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}
