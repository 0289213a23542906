use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{ProcessingError, Result};

/// Calendar quarter, ordered chronologically and written as `YYYYQN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuarterKey {
    year: u16,
    quarter: u8,
}

impl QuarterKey {
    pub fn new(year: u16, quarter: u8) -> Result<Self> {
        if !(1..=4).contains(&quarter) || year > 9999 {
            return Err(ProcessingError::InvalidQuarter(format!(
                "{}-q{}",
                year, quarter
            )));
        }
        Ok(Self { year, quarter })
    }

    /// Parse a quarter folder name such as `2025-q4` (case-insensitive)
    pub fn from_folder_name(name: &str) -> Result<Self> {
        let invalid = || ProcessingError::InvalidQuarter(name.to_string());

        let lower = name.to_ascii_lowercase();
        let (year, quarter) = lower.split_once("-q").ok_or_else(invalid)?;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if quarter.len() != 1 || !matches!(quarter.as_bytes()[0], b'1'..=b'4') {
            return Err(invalid());
        }

        let year = year.parse::<u16>().map_err(|_| invalid())?;
        let quarter = quarter.parse::<u8>().map_err(|_| invalid())?;
        Ok(Self { year, quarter })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }
}

/// Canonical quarter key for a folder name: `2025-q4` -> `2025Q4`
pub fn folder_to_quarter(name: &str) -> Result<String> {
    QuarterKey::from_folder_name(name).map(|key| key.to_string())
}

impl fmt::Display for QuarterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}Q{}", self.year, self.quarter)
    }
}

impl FromStr for QuarterKey {
    type Err = ProcessingError;

    /// Parse the canonical `YYYYQN` form
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ProcessingError::InvalidQuarter(s.to_string());

        let (year, quarter) = s.split_once('Q').ok_or_else(invalid)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) || quarter.len() != 1 {
            return Err(invalid());
        }

        let year = year.parse::<u16>().map_err(|_| invalid())?;
        let quarter = quarter.parse::<u8>().map_err(|_| invalid())?;
        Self::new(year, quarter).map_err(|_| invalid())
    }
}

impl Serialize for QuarterKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuarterKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
