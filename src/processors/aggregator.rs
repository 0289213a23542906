use crate::models::{AggregateRecord, CleanTransaction, QuarterStats};
use crate::processors::ReplicationTable;
use crate::utils::constants::DEFAULT_MIN_SAMPLE_COUNT;
use crate::utils::stats::{median, round_half_even};
use std::collections::BTreeMap;

/// Collected prices for one admin key
#[derive(Debug, Clone, Default)]
struct PriceAccumulator {
    total_prices: Vec<f64>,
    unit_prices_ping: Vec<f64>,
}

impl PriceAccumulator {
    fn push(&mut self, row: &CleanTransaction) {
        self.total_prices.push(row.total_price);
        self.unit_prices_ping.push(row.unit_price_ping);
    }

    fn finish(mut self) -> Option<AggregateRecord> {
        let count = self.total_prices.len();
        let total = median(&mut self.total_prices)?;
        let unit = median(&mut self.unit_prices_ping)?;

        Some(AggregateRecord::new(
            count,
            round_half_even(total),
            round_half_even(unit),
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub stats: QuarterStats,
    pub rules_fired: usize,
    pub dropped_below_min: usize,
}

/// Groups cleaned transactions by admin key and computes medians
pub struct Aggregator {
    min_sample_count: usize,
    replication: ReplicationTable,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            min_sample_count: DEFAULT_MIN_SAMPLE_COUNT,
            replication: ReplicationTable::empty(),
        }
    }

    pub fn with_min_sample_count(mut self, min_sample_count: usize) -> Self {
        self.min_sample_count = min_sample_count;
        self
    }

    pub fn with_replication(mut self, replication: ReplicationTable) -> Self {
        self.replication = replication;
        self
    }

    /// Group, finalize medians, replicate city-wide figures, then drop
    /// groups under the minimum sample count
    pub fn aggregate(&self, rows: &[CleanTransaction]) -> AggregationOutcome {
        let mut groups: BTreeMap<&str, PriceAccumulator> = BTreeMap::new();
        for row in rows {
            groups.entry(row.admin_key.as_str()).or_default().push(row);
        }

        let mut stats: QuarterStats = groups
            .into_iter()
            .filter_map(|(key, acc)| acc.finish().map(|record| (key.to_string(), record)))
            .collect();

        let rules_fired = self.replication.apply(&mut stats);

        let before = stats.len();
        stats.retain(|_, record| record.count >= self.min_sample_count);

        AggregationOutcome {
            dropped_below_min: before - stats.len(),
            stats,
            rules_fired,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}
