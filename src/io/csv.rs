use crate::coord::Crs;
use crate::error::MercatorError;
use crate::geom::parse_geometry;
use crate::mercator::GlobalMercator;
use crate::tile::Tile;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

enum SourceIndices {
    Geometry(usize),
    Coordinates { x_idx: usize, y_idx: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate X and Y columns (Longitude/Latitude or Mercator meters)
    CoordinateColumns { x_column: String, y_column: String },
}

#[derive(Debug, Clone)]
pub struct CsvTileConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub zoom_level: u8,
    pub crs: Crs,
    pub include_tile_geometry: Option<GeometryFormat>,
    pub mercator: GlobalMercator,
}

impl CsvTileConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use mercator_tiles::CsvTileConfig;
    ///
    /// let config = CsvTileConfig::new("geometry", 12);
    /// ```
    pub fn new(geometry_column: impl Into<String>, zoom_level: u8) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            zoom_level,
            crs: Crs::default(),
            include_tile_geometry: None,
            mercator: GlobalMercator::default(),
        }
    }

    /// Create config for a CSV with separate X/Y coordinate columns.
    ///
    /// # Example
    /// ```
    /// use mercator_tiles::{CsvTileConfig, Crs};
    ///
    /// // Longitude/Latitude
    /// let config = CsvTileConfig::from_coords("Longitude", "Latitude", 12);
    ///
    /// // Mercator meters
    /// let config = CsvTileConfig::from_coords("mx", "my", 12).crs(Crs::WebMercator);
    /// ```
    pub fn from_coords(
        x_column: impl Into<String>,
        y_column: impl Into<String>,
        zoom_level: u8,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                x_column: x_column.into(),
                y_column: y_column.into(),
            },
            exclude_columns: Vec::new(),
            zoom_level,
            crs: Crs::default(),
            include_tile_geometry: None,
            mercator: GlobalMercator::default(),
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    pub fn mercator(mut self, mercator: GlobalMercator) -> Self {
        self.mercator = mercator;
        self
    }

    // Adds the tile footprint (lon/lat) as a column.
    pub fn with_tile_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_tile_geometry = Some(format);
        self
    }
}

pub trait CsvToTile {
    fn to_tile_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvTileConfig,
    ) -> Result<(), MercatorError>;
}

impl<P: AsRef<Path>> CsvToTile for P {
    fn to_tile_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvTileConfig,
    ) -> Result<(), MercatorError> {
        csv_to_tile_csv(self, output_path, config)
    }
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

fn column_index(headers: &csv::StringRecord, name: &str, role: &str) -> Result<usize, MercatorError> {
    if name.is_empty() {
        return Err(MercatorError::CsvError(format!(
            "{} column name cannot be empty",
            role
        )));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| MercatorError::CsvError(format!("{} column '{}' not found", role, name)))
}

fn parse_field(record: &csv::StringRecord, idx: usize, role: &str) -> Result<f64, MercatorError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| MercatorError::CsvError(format!("Missing {} column at index {}", role, idx)))?
        .trim();
    raw.parse()
        .map_err(|_| MercatorError::CsvError(format!("Invalid {} coordinate: '{}'", role, raw)))
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file of tiles.
///
/// The source columns are replaced by `quadkey, tx, ty, zoom` (TMS indices),
/// optionally followed by `tile_geometry`. Lines and multi-geometries produce
/// one output row per tile. Output is streamed row by row.
///
/// # Example with geometry column (WKT or GeoJSON)
///
/// ```no_run
/// use mercator_tiles::{csv_to_tile_csv, CsvTileConfig, GeometryFormat};
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// let config = CsvTileConfig::new("route", 14)
///     .exclude(vec!["notes".into()])
///     .with_tile_geometry(GeometryFormat::Wkt);
///
/// csv_to_tile_csv("routes.csv", "route_tiles.csv", &config)?;
/// # Ok(())
/// # }
/// ```
///
/// # Example with coordinate columns
///
/// ```no_run
/// use mercator_tiles::{csv_to_tile_csv, CsvTileConfig};
///
/// # fn main() -> Result<(), mercator_tiles::MercatorError> {
/// let config = CsvTileConfig::from_coords("lon", "lat", 12);
/// csv_to_tile_csv("stops.csv", "stop_tiles.csv", &config)?;
/// # Ok(())
/// # }
/// ```
pub fn csv_to_tile_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvTileConfig,
) -> Result<(), MercatorError> {
    let file = File::open(csv_path.as_ref()).map_err(|e| MercatorError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| MercatorError::CsvError(e.to_string()))?
        .clone();

    // Source columns never reach the output
    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = column_index(&headers, col, "Geometry")?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns { x_column, y_column } => {
            let x_idx = column_index(&headers, x_column, "X")?;
            let y_idx = column_index(&headers, y_column, "Y")?;
            (
                SourceIndices::Coordinates { x_idx, y_idx },
                HashSet::from([x_idx, y_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file =
        File::create(output_path.as_ref()).map_err(|e| MercatorError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["quadkey", "tx", "ty", "zoom"];
    if config.include_tile_geometry.is_some() {
        header_row.push("tile_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| MercatorError::CsvError(e.to_string()))?;

    let mercator = &config.mercator;
    let mut rows_in = 0usize;
    let mut rows_out = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| MercatorError::CsvError(e.to_string()))?;
        rows_in += 1;

        let tiles = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    MercatorError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                let geom = parse_geometry(geom_str)?;
                Tile::from_geometry(mercator, geom, config.zoom_level, config.crs)?
            }
            SourceIndices::Coordinates { x_idx, y_idx } => {
                let x = parse_field(&record, *x_idx, "X")?;
                let y = parse_field(&record, *y_idx, "Y")?;

                let tile = match config.crs {
                    Crs::Wgs84 => Tile::from_wgs84(mercator, &(x, y), config.zoom_level)?,
                    Crs::WebMercator => Tile::from_meters(mercator, &(x, y), config.zoom_level)?,
                };
                vec![tile]
            }
        };

        for tile in tiles {
            let mut row: Vec<String> = vec![
                tile.id.clone(),
                tile.tx().to_string(),
                tile.ty().to_string(),
                tile.zoom().to_string(),
            ];

            if let Some(format) = config.include_tile_geometry {
                let polygon = tile.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| MercatorError::CsvError(e.to_string()))?;
            rows_out += 1;
        }

        if rows_in % 100_000 == 0 {
            debug!(rows = rows_in, "CSV rows processed");
        }
    }

    writer
        .flush()
        .map_err(|e| MercatorError::IoError(e.to_string()))?;

    info!(
        input_rows = rows_in,
        output_rows = rows_out,
        zoom = config.zoom_level,
        path = %output_path.as_ref().display(),
        "Wrote tile CSV"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_input(path: &Path, lines: &[&str]) -> Result<(), MercatorError> {
        let mut file = File::create(path).map_err(|e| MercatorError::IoError(e.to_string()))?;
        for line in lines {
            writeln!(file, "{}", line).map_err(|e| MercatorError::IoError(e.to_string()))?;
        }
        Ok(())
    }

    fn read_rows(path: &Path) -> Result<Vec<csv::StringRecord>, MercatorError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| MercatorError::CsvError(e.to_string()))?;
        reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MercatorError::CsvError(e.to_string()))
    }

    #[test]
    fn test_csv_from_coords_wgs84() -> Result<(), MercatorError> {
        let dir = tempdir().map_err(|e| MercatorError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("stops.csv");
        let output_path = dir.path().join("output.csv");

        write_input(
            &csv_path,
            &["ID,Longitude,Latitude,Description", "1,13.24,52.31,Berlin south-west"],
        )?;

        let config = CsvTileConfig::from_coords("Longitude", "Latitude", 15);
        csv_to_tile_csv(&csv_path, &output_path, &config)?;

        let output =
            std::fs::read_to_string(&output_path).map_err(|e| MercatorError::IoError(e.to_string()))?;
        assert!(output.starts_with("quadkey,tx,ty,zoom,ID,Description"));
        assert!(!output.contains("Longitude"));

        let rows = read_rows(&output_path)?;
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "120212010132103");
        assert_eq!(&rows[0][1], "17589");
        assert_eq!(&rows[0][2], "21990");
        assert_eq!(&rows[0][3], "15");
        assert_eq!(&rows[0][5], "Berlin south-west");
        Ok(())
    }

    #[test]
    fn test_csv_from_coords_web_mercator() -> Result<(), MercatorError> {
        let dir = tempdir().map_err(|e| MercatorError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("meters.csv");
        let output_path = dir.path().join("output.csv");

        write_input(&csv_path, &["name,mx,my", "berlin,1473870.058102942,6856372.69101939"])?;

        let config = CsvTileConfig::from_coords("mx", "my", 7).crs(Crs::WebMercator);
        csv_path.to_tile_csv(&output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert_eq!(&rows[0][0], "1202120");
        assert_eq!(&rows[0][4], "berlin");
        Ok(())
    }

    #[test]
    fn test_csv_geometry_column_with_tile_geometry() -> Result<(), MercatorError> {
        let dir = tempdir().map_err(|e| MercatorError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("assets.csv");
        let output_path = dir.path().join("output.csv");

        write_input(
            &csv_path,
            &[
                "ASSET_ID,TYPE,geometry",
                "A1,Mast,\"{\"\"type\"\":\"\"Point\"\",\"\"coordinates\"\":[13.24,52.31]}\"",
                "A2,Mast,\"POINT(13.24 52.31)\"",
            ],
        )?;

        let config = CsvTileConfig::new("geometry", 11).with_tile_geometry(GeometryFormat::Wkt);
        csv_to_tile_csv(&csv_path, &output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(&row[0], "12021201013");
            assert!(row[4].starts_with("POLYGON"));
        }
        Ok(())
    }

    #[test]
    fn test_csv_line_geometry_fans_out() -> Result<(), MercatorError> {
        let dir = tempdir().map_err(|e| MercatorError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("routes.csv");
        let output_path = dir.path().join("output.csv");

        write_input(
            &csv_path,
            &["route,notes,geometry", "R1,skip me,\"LINESTRING(13.1 52.3, 13.7 52.6)\""],
        )?;

        let config = CsvTileConfig::new("geometry", 12)
            .exclude(vec!["notes".into()])
            .with_tile_geometry(GeometryFormat::GeoJson);
        csv_to_tile_csv(&csv_path, &output_path, &config)?;

        let rows = read_rows(&output_path)?;
        assert!(rows.len() > 1);
        for row in &rows {
            assert_eq!(row.len(), 6);
            assert!(row[4].contains("\"Polygon\""));
            assert_eq!(&row[5], "R1");
        }
        Ok(())
    }

    #[test]
    fn test_csv_errors() -> Result<(), MercatorError> {
        let dir = tempdir().map_err(|e| MercatorError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("bad.csv");
        let output_path = dir.path().join("output.csv");

        write_input(&csv_path, &["lon,lat", "abc,52.3"])?;

        let missing = CsvTileConfig::from_coords("x", "lat", 5);
        assert!(matches!(
            csv_to_tile_csv(&csv_path, &output_path, &missing),
            Err(MercatorError::CsvError(_))
        ));

        let invalid = CsvTileConfig::from_coords("lon", "lat", 5);
        assert!(matches!(
            csv_to_tile_csv(&csv_path, &output_path, &invalid),
            Err(MercatorError::CsvError(_))
        ));

        let empty_name = CsvTileConfig::new("", 5);
        assert!(csv_to_tile_csv(&csv_path, &output_path, &empty_name).is_err());

        assert!(matches!(
            csv_to_tile_csv(dir.path().join("missing.csv"), &output_path, &invalid),
            Err(MercatorError::IoError(_))
        ));
        Ok(())
    }
}
