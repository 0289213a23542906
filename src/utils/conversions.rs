use crate::utils::constants::{PING_FACTOR, ROC_YEAR_OFFSET};
use chrono::NaiveDate;

/// Convert a ROC calendar date in `yyyMMdd` form to a Gregorian date
///
/// Anything other than exactly seven ASCII digits forming a valid
/// calendar date yields `None`.
///
/// # Examples
/// ```
/// use lvr_stats::utils::roc_to_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(roc_to_date("1140203"), NaiveDate::from_ymd_opt(2025, 2, 3));
/// assert_eq!(roc_to_date("114023"), None);
/// ```
pub fn roc_to_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 7 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = value[..3].parse::<i32>().ok()? + ROC_YEAR_OFFSET;
    let month = value[3..5].parse::<u32>().ok()?;
    let day = value[5..7].parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a price field, treating blanks and non-numeric text as missing
pub fn parse_price(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Convert a price per square meter to a price per ping
pub fn sqm_to_ping_price(price_per_sqm: f64) -> f64 {
    price_per_sqm * PING_FACTOR
}
