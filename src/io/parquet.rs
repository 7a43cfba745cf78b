use crate::error::MercatorError;
use crate::io::arrow::TilesToArrow;
use crate::tile::Tile;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Writes a record batch with a geoarrow geometry column as GeoParquet (WKB encoded).
pub fn write_geoparquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), MercatorError> {
    let schema = batch.schema();

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();

    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options)
        .map_err(|e| MercatorError::IoError(e.to_string()))?;

    let file = File::create(path.as_ref()).map_err(|e| MercatorError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None)
        .map_err(|e| MercatorError::IoError(e.to_string()))?;

    let encoded_batch = encoder
        .encode_record_batch(batch)
        .map_err(|e| MercatorError::IoError(e.to_string()))?;

    writer
        .write(&encoded_batch)
        .map_err(|e| MercatorError::IoError(e.to_string()))?;

    let kv_metadata = encoder
        .into_keyvalue()
        .map_err(|e| MercatorError::IoError(e.to_string()))?;

    writer.append_key_value_metadata(kv_metadata);
    writer
        .finish()
        .map_err(|e| MercatorError::IoError(e.to_string()))?;

    info!(
        rows = batch.num_rows(),
        path = %path.as_ref().display(),
        "Wrote GeoParquet"
    );
    Ok(())
}

pub trait TilesToGeoParquet: TilesToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercatorError>;
}

impl TilesToGeoParquet for [Tile] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercatorError> {
        let batch = self.to_record_batch()?;
        write_geoparquet(&batch, path)
    }
}

impl TilesToGeoParquet for Vec<Tile> {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), MercatorError> {
        self.as_slice().to_geoparquet(path)
    }
}
