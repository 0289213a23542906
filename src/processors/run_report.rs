use crate::models::{Granularity, QuarterKey};
use crate::readers::CleaningStats;
use std::path::PathBuf;

/// What happened during a pipeline run, for the end-of-run summary
#[derive(Debug, Clone)]
pub struct RunReport {
    pub granularity: Granularity,
    pub files_read: usize,
    pub skipped_files: Vec<PathBuf>,
    pub rows_read: usize,
    pub invalid_dates: usize,
    pub filtered_prices: usize,
    pub city_wide_files: usize,
    pub rules_fired: usize,
    pub groups_below_min: usize,
    pub empty_quarters: Vec<QuarterKey>,
    pub duplicate_quarters: usize,
    pub quarters_written: usize,
    pub regions_written: usize,
    pub synthetic_records: usize,
}

impl RunReport {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            files_read: 0,
            skipped_files: Vec::new(),
            rows_read: 0,
            invalid_dates: 0,
            filtered_prices: 0,
            city_wide_files: 0,
            rules_fired: 0,
            groups_below_min: 0,
            empty_quarters: Vec::new(),
            duplicate_quarters: 0,
            quarters_written: 0,
            regions_written: 0,
            synthetic_records: 0,
        }
    }

    pub fn record_file(&mut self, stats: &CleaningStats) {
        self.files_read += 1;
        self.rows_read += stats.rows_read;
        self.invalid_dates += stats.invalid_dates;
        self.filtered_prices += stats.filtered_prices;
        if stats.collapsed_city_wide {
            self.city_wide_files += 1;
        }
    }

    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.invalid_dates - self.filtered_prices
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        let pct = |n: usize| {
            if self.rows_read == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.rows_read as f64
            }
        };

        summary.push_str(&format!("=== Run Report ({} level) ===\n", self.granularity));
        summary.push_str(&format!("Files read: {}\n", self.files_read));
        summary.push_str(&format!("Files skipped: {}\n", self.skipped_files.len()));
        summary.push_str(&format!("Rows read: {}\n", self.rows_read));
        summary.push_str(&format!(
            "Rows kept: {} ({:.1}%)\n",
            self.rows_kept(),
            pct(self.rows_kept())
        ));
        summary.push_str(&format!(
            "Invalid dates: {} ({:.1}%)\n",
            self.invalid_dates,
            pct(self.invalid_dates)
        ));
        summary.push_str(&format!(
            "Outside price bounds: {} ({:.1}%)\n",
            self.filtered_prices,
            pct(self.filtered_prices)
        ));

        if self.city_wide_files > 0 || self.rules_fired > 0 {
            summary.push_str(&format!(
                "City-wide files: {}, replications: {}, synthetic entries: {}\n",
                self.city_wide_files, self.rules_fired, self.synthetic_records
            ));
        }
        if self.groups_below_min > 0 {
            summary.push_str(&format!(
                "Regions under minimum sample count: {}\n",
                self.groups_below_min
            ));
        }

        summary.push_str(&format!(
            "\nQuarters written: {} ({} region entries)\n",
            self.quarters_written, self.regions_written
        ));
        if !self.empty_quarters.is_empty() {
            let empty: Vec<String> = self.empty_quarters.iter().map(|q| q.to_string()).collect();
            summary.push_str(&format!("Quarters without usable rows: {}\n", empty.join(", ")));
        }
        if self.duplicate_quarters > 0 {
            summary.push_str(&format!(
                "Duplicate quarter folders: {}\n",
                self.duplicate_quarters
            ));
        }

        if !self.skipped_files.is_empty() {
            summary.push_str("\nSkipped files (unknown city code):\n");
            for path in self.skipped_files.iter().take(10) {
                summary.push_str(&format!("  {}\n", path.display()));
            }
        }

        summary
    }
}
