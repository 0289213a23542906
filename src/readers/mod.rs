pub mod quarter_scanner;
pub mod transaction_reader;

pub use quarter_scanner::{CityFile, QuarterFolder, QuarterScanner};
pub use transaction_reader::{CityTransactions, CleaningStats, TransactionReader};
