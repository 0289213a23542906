use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Granularity, QuarterStats, StatsDocument};
use crate::processors::{Aggregator, ReplicationTable, RunReport};
use crate::readers::{CityFile, QuarterFolder, QuarterScanner, TransactionReader};
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::{info, warn};

/// Runs discovery, cleaning and aggregation for every quarter folder
pub struct QuarterlyPipeline {
    granularity: Granularity,
    scanner: QuarterScanner,
    reader: TransactionReader,
    aggregator: Aggregator,
}

impl QuarterlyPipeline {
    pub fn new(granularity: Granularity, config: &PipelineConfig) -> Self {
        let replication = match granularity {
            Granularity::Town => config.city_wide.clone(),
            Granularity::County => ReplicationTable::empty(),
        };

        Self {
            granularity,
            scanner: QuarterScanner::new(),
            reader: TransactionReader::new(granularity).with_replication(replication.clone()),
            aggregator: Aggregator::new()
                .with_min_sample_count(config.min_sample_count)
                .with_replication(replication),
        }
    }

    /// Process all quarter folders under `base_dir` into one document
    pub fn run(
        &self,
        base_dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(StatsDocument, RunReport)> {
        let folders = self.scanner.scan(base_dir)?;
        let mut document = StatsDocument::new();
        let mut report = RunReport::new(self.granularity);

        for folder in &folders {
            if let Some(p) = progress {
                p.set_message(&folder.key.to_string());
            }

            info!("== {} from folder: {} ==", folder.key, folder.path.display());
            match self.process_quarter(folder, &mut report)? {
                Some(stats) => {
                    if document.insert_quarter(folder.key, stats) {
                        warn!(
                            "Quarter {} appears in more than one folder; keeping {}",
                            folder.key,
                            folder.path.display()
                        );
                        report.duplicate_quarters += 1;
                    }
                }
                None => {
                    info!("  (no usable CSV rows in {})", folder.path.display());
                    report.empty_quarters.push(folder.key);
                }
            }
        }

        report.quarters_written = document.quarters.len();
        report.regions_written = document.total_regions();
        report.synthetic_records = document.synthetic_count();

        Ok((document, report))
    }

    /// Clean and aggregate one quarter; `None` when no row survived cleaning
    pub fn process_quarter(
        &self,
        folder: &QuarterFolder,
        report: &mut RunReport,
    ) -> Result<Option<QuarterStats>> {
        let mut rows = Vec::new();

        for file in self.scanner.city_files(&folder.path)? {
            let (path, city) = match file {
                CityFile::Known { path, city } => (path, city),
                CityFile::Unknown { path } => {
                    warn!("  skip unknown city code: {}", path.display());
                    report.skipped_files.push(path);
                    continue;
                }
            };

            info!(
                "  read {} → {}",
                path.file_name().unwrap_or_default().to_string_lossy(),
                city
            );
            let city_rows = self.reader.read_city_file(&path, city)?;
            report.record_file(&city_rows.stats);

            if city_rows.stats.collapsed_city_wide {
                info!("  {} has no district breakdown, treating as city-wide", city);
            }

            rows.extend(city_rows.rows);
        }

        if rows.is_empty() {
            return Ok(None);
        }

        let outcome = self.aggregator.aggregate(&rows);
        report.rules_fired += outcome.rules_fired;
        report.groups_below_min += outcome.dropped_below_min;

        Ok(Some(outcome.stats))
    }
}
