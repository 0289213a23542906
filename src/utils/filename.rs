use crate::models::Granularity;
use crate::utils::constants::{COUNTY_OUTPUT_FILE, TOWN_OUTPUT_FILE};
use std::path::{Path, PathBuf};

/// Default JSON output path for a run at the given granularity
pub fn default_output_filename(granularity: Granularity) -> PathBuf {
    match granularity {
        Granularity::Town => PathBuf::from(TOWN_OUTPUT_FILE),
        Granularity::County => PathBuf::from(COUNTY_OUTPUT_FILE),
    }
}

/// Check whether a file name looks like a per-city LVR transaction file
pub fn is_city_file_name(name: &str, suffix: &str) -> bool {
    name.ends_with(suffix)
}

/// First character of the file name, used as the city code
pub fn city_code_of(path: &Path) -> Option<char> {
    path.file_name()
        .and_then(|f| f.to_str())
        .and_then(|f| f.chars().next())
}
