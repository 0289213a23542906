use crate::error::{ProcessingError, Result};
use crate::models::StatsDocument;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
};
use arrow::array::{ArrayRef, BooleanArray, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Flat-table export of a stats document, one row per quarter and region
pub struct ParquetWriter {
    compression: Compression,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn write_document(&self, document: &StatsDocument, path: &Path) -> Result<()> {
        let schema = Self::create_schema();
        let batch = Self::document_to_batch(document, schema.clone())?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn create_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("quarter", DataType::Utf8, false),
            Field::new("admin_key", DataType::Utf8, false),
            Field::new("count", DataType::UInt64, false),
            Field::new("median_total_price", DataType::Int64, false),
            Field::new("median_unit_price_ping", DataType::Int64, false),
            Field::new("synthetic", DataType::Boolean, false),
        ]))
    }

    fn document_to_batch(document: &StatsDocument, schema: Arc<Schema>) -> Result<RecordBatch> {
        let mut quarters = Vec::new();
        let mut admin_keys = Vec::new();
        let mut counts = Vec::new();
        let mut total_prices = Vec::new();
        let mut unit_prices = Vec::new();
        let mut synthetic = Vec::new();

        for (quarter, admin_key, record) in document.rows() {
            quarters.push(quarter.to_string());
            admin_keys.push(admin_key.to_string());
            counts.push(record.count as u64);
            total_prices.push(record.median_total_price);
            unit_prices.push(record.median_unit_price_ping);
            synthetic.push(record.synthetic);
        }

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(quarters)),
            Arc::new(StringArray::from(admin_keys)),
            Arc::new(UInt64Array::from(counts)),
            Arc::new(Int64Array::from(total_prices)),
            Arc::new(Int64Array::from(unit_prices)),
            Arc::new(BooleanArray::from(synthetic)),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: metadata.num_row_groups(),
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.1} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}
