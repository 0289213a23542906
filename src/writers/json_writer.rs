use crate::error::Result;
use crate::models::StatsDocument;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes the stats document the map front-end loads.
///
/// serde_json leaves non-ASCII untouched, so county and district names
/// come out as literal characters.
pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write_document(&self, document: &StatsDocument, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, document)?;
        } else {
            serde_json::to_writer(&mut writer, document)?;
        }
        writer.flush()?;

        Ok(())
    }

    pub fn read_document(path: &Path) -> Result<StatsDocument> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AggregateRecord, QuarterKey, QuarterStats};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_document() -> StatsDocument {
        let mut stats = QuarterStats::new();
        stats.insert(
            "新竹市東區".to_string(),
            AggregateRecord::new(5, 8_000_000, 600_000).as_synthetic(),
        );
        stats.insert(
            "臺北市大安區".to_string(),
            AggregateRecord::new(12, 25_000_000, 1_250_000),
        );

        let mut document = StatsDocument::new();
        document.insert_quarter(QuarterKey::new(2025, 4).unwrap(), stats);
        document
    }

    #[test]
    fn test_write_keeps_non_ascii_literal() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested/out/stats.json");

        JsonWriter::new().write_document(&sample_document(), &path)?;

        let text = fs::read_to_string(&path)?;
        assert!(text.contains("臺北市大安區"));
        assert!(!text.contains("\\u"));
        assert!(text.contains(r#""synthetic":true"#));
        Ok(())
    }

    #[test]
    fn test_read_back() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("stats.json");
        let document = sample_document();

        JsonWriter::new()
            .with_pretty(true)
            .write_document(&document, &path)?;

        assert_eq!(JsonWriter::read_document(&path)?, document);
        Ok(())
    }
}
