pub mod aggregate;
pub mod quarter;
pub mod transaction;

pub use aggregate::{AggregateRecord, QuarterStats, StatsDocument};
pub use quarter::{folder_to_quarter, QuarterKey};
pub use transaction::{CleanTransaction, Granularity, RawTransaction};
