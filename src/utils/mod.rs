pub mod constants;
pub mod conversions;
pub mod filename;
pub mod progress;
pub mod stats;

pub use constants::*;
pub use conversions::{parse_price, roc_to_date, sqm_to_ping_price};
pub use filename::default_output_filename;
pub use progress::ProgressReporter;
pub use stats::{median, round_half_even};
