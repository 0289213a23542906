use crate::error::Result;
use crate::models::{CleanTransaction, Granularity, RawTransaction};
use crate::processors::ReplicationTable;
use crate::utils::constants::{
    MAX_UNIT_PRICE_PING, MIN_TOTAL_PRICE, MIN_UNIT_PRICE_PING, TRADE_DATE_COLUMN,
};
use crate::utils::conversions::{parse_price, roc_to_date, sqm_to_ping_price};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// Row counts from cleaning one city file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub rows_read: usize,
    pub invalid_dates: usize,
    pub filtered_prices: usize,
    pub collapsed_city_wide: bool,
}

impl CleaningStats {
    pub fn rows_kept(&self) -> usize {
        self.rows_read - self.invalid_dates - self.filtered_prices
    }
}

#[derive(Debug, Clone, Default)]
pub struct CityTransactions {
    pub rows: Vec<CleanTransaction>,
    pub stats: CleaningStats,
}

/// Reads one `<code>_lvr_land_a.csv` file and cleans its rows
pub struct TransactionReader {
    granularity: Granularity,
    replication: ReplicationTable,
}

impl TransactionReader {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            replication: ReplicationTable::empty(),
        }
    }

    pub fn with_replication(mut self, replication: ReplicationTable) -> Self {
        self.replication = replication;
        self
    }

    /// Read a city file from disk; a UTF-8 BOM is stripped before parsing
    pub fn read_city_file(&self, path: &Path, city: &str) -> Result<CityTransactions> {
        let bytes = fs::read(path)?;
        let (text, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
        if had_errors {
            warn!(
                "{} contains invalid UTF-8; bad bytes were replaced",
                path.display()
            );
        }

        self.read_city_csv(text.as_bytes(), city)
    }

    /// Parse CSV text whose second line is the English column-description
    /// row; that row is skipped
    pub fn read_city_csv<R: Read>(&self, reader: R, city: &str) -> Result<CityTransactions> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let has_date_column = headers.iter().any(|h| h == TRADE_DATE_COLUMN);

        let mut rows = Vec::new();
        for (index, result) in csv_reader.records().enumerate() {
            let record = result?;
            if index == 0 {
                continue;
            }
            rows.push(record.deserialize::<RawTransaction>(Some(&headers))?);
        }

        Ok(self.clean_rows(rows, has_date_column, city))
    }

    /// Apply the cleaning steps to already-parsed rows
    pub fn clean_rows(
        &self,
        rows: Vec<RawTransaction>,
        has_date_column: bool,
        city: &str,
    ) -> CityTransactions {
        let mut stats = CleaningStats {
            rows_read: rows.len(),
            ..Default::default()
        };

        let rows: Vec<RawTransaction> = if has_date_column {
            rows.into_iter()
                .filter(|r| r.trade_date.as_deref().and_then(roc_to_date).is_some())
                .collect()
        } else {
            rows
        };
        stats.invalid_dates = stats.rows_read - rows.len();

        let forced_town = match self.granularity {
            Granularity::Town => self
                .replication
                .rule_for(city)
                .filter(|rule| rule.lacks_districts(rows.iter().map(|r| r.town_name())))
                .and_then(|rule| rule.placeholder_district()),
            Granularity::County => None,
        };
        stats.collapsed_city_wide = forced_town.is_some();

        let mut cleaned = Vec::with_capacity(rows.len());
        for row in &rows {
            let total_price = parse_price(row.total_price.as_deref());
            let unit_price_ping = parse_price(row.unit_price.as_deref()).map(sqm_to_ping_price);

            let (Some(total_price), Some(unit_price_ping)) = (total_price, unit_price_ping) else {
                continue;
            };
            if !passes_price_filter(total_price, unit_price_ping) {
                continue;
            }

            let town = forced_town.unwrap_or_else(|| row.town_name());
            cleaned.push(CleanTransaction::new(
                self.granularity.admin_key(city, town),
                total_price,
                unit_price_ping,
            ));
        }
        stats.filtered_prices = rows.len() - cleaned.len();

        CityTransactions {
            rows: cleaned,
            stats,
        }
    }
}

/// Excludes family transfers, data-entry errors and other non-market prices
pub fn passes_price_filter(total_price: f64, unit_price_ping: f64) -> bool {
    total_price > MIN_TOTAL_PRICE
        && unit_price_ping > MIN_UNIT_PRICE_PING
        && unit_price_ping < MAX_UNIT_PRICE_PING
}
