use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::QuarterKey;

/// Sample count and median prices for one administrative region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub count: usize,
    pub median_total_price: i64,
    pub median_unit_price_ping: i64,

    /// Copied from a city-wide figure rather than observed per district
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl AggregateRecord {
    pub fn new(count: usize, median_total_price: i64, median_unit_price_ping: i64) -> Self {
        Self {
            count,
            median_total_price,
            median_unit_price_ping,
            synthetic: false,
        }
    }

    pub fn as_synthetic(&self) -> Self {
        Self {
            synthetic: true,
            ..self.clone()
        }
    }
}

/// Aggregates for one quarter, keyed by admin key
pub type QuarterStats = BTreeMap<String, AggregateRecord>;

/// The JSON document consumed by the map front-end
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsDocument {
    pub quarters: Vec<QuarterKey>,
    pub data: BTreeMap<QuarterKey, QuarterStats>,
}

impl StatsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quarter's aggregates, replacing any earlier entry for it.
    /// Returns true if the quarter was already present.
    pub fn insert_quarter(&mut self, quarter: QuarterKey, stats: QuarterStats) -> bool {
        let replaced = self.data.insert(quarter, stats).is_some();
        if !replaced {
            self.quarters.push(quarter);
            self.quarters.sort();
        }
        replaced
    }

    pub fn latest_quarter(&self) -> Option<QuarterKey> {
        self.quarters.last().copied()
    }

    pub fn total_regions(&self) -> usize {
        self.data.values().map(|q| q.len()).sum()
    }

    pub fn synthetic_count(&self) -> usize {
        self.data
            .values()
            .flat_map(|q| q.values())
            .filter(|r| r.synthetic)
            .count()
    }

    /// Flatten to (quarter, admin key, record) rows in document order
    pub fn rows(&self) -> impl Iterator<Item = (QuarterKey, &str, &AggregateRecord)> + '_ {
        self.data.iter().flat_map(|(quarter, stats)| {
            stats
                .iter()
                .map(move |(key, record)| (*quarter, key.as_str(), record))
        })
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Stats Document ===\n");
        summary.push_str(&format!("Quarters: {}\n", self.quarters.len()));
        if let (Some(first), Some(last)) = (self.quarters.first(), self.quarters.last()) {
            summary.push_str(&format!("Range: {} to {}\n", first, last));
        }
        summary.push_str(&format!("Region entries: {}\n", self.total_regions()));
        summary.push_str(&format!("Synthetic entries: {}\n", self.synthetic_count()));

        summary.push_str("\nPer quarter:\n");
        for quarter in &self.quarters {
            if let Some(stats) = self.data.get(quarter) {
                let samples: usize = stats.values().map(|r| r.count).sum();
                summary.push_str(&format!(
                    "  {}: {} regions, {} transactions\n",
                    quarter,
                    stats.len(),
                    samples
                ));
            }
        }

        summary
    }
}
