use serde::{Deserialize, Serialize};

/// One row of an LVR transaction CSV, looked up by header name
///
/// Every field is optional: files from different years carry slightly
/// different column sets, and blank cells deserialize to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTransaction {
    #[serde(rename = "鄉鎮市區", default)]
    pub district: Option<String>,

    #[serde(rename = "交易年月日", default)]
    pub trade_date: Option<String>,

    #[serde(rename = "總價元", default)]
    pub total_price: Option<String>,

    #[serde(rename = "單價元平方公尺", default)]
    pub unit_price: Option<String>,
}

impl RawTransaction {
    /// District name trimmed of whitespace, empty when missing
    pub fn town_name(&self) -> &str {
        self.district.as_deref().map(str::trim).unwrap_or("")
    }
}

/// A transaction that survived cleaning, keyed by administrative region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanTransaction {
    pub admin_key: String,
    pub total_price: f64,
    pub unit_price_ping: f64,
}

impl CleanTransaction {
    pub fn new(admin_key: String, total_price: f64, unit_price_ping: f64) -> Self {
        Self {
            admin_key,
            total_price,
            unit_price_ping,
        }
    }
}

/// Level of the administrative hierarchy that aggregates are keyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// `COUNTYNAME + TOWNNAME`, with city-wide replication
    Town,
    /// `COUNTYNAME` only
    County,
}

impl Granularity {
    pub fn admin_key(&self, county: &str, town: &str) -> String {
        match self {
            Granularity::Town => format!("{}{}", county, town),
            Granularity::County => county.to_string(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Granularity::Town => "town",
            Granularity::County => "county",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
