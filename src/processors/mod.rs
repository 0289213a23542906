pub mod aggregator;
pub mod pipeline;
pub mod replication;
pub mod run_report;

pub use aggregator::{AggregationOutcome, Aggregator};
pub use pipeline::QuarterlyPipeline;
pub use replication::{CityWideRule, ReplicationTable};
pub use run_report::RunReport;
