//! Forecast horizon and target date handling

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// ISO date format, accepted for target dates in addition to the configured one
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of whole days to forecast past `last_known` to reach `target`.
///
/// Never negative: a target on or before the last known date needs no
/// extrapolation.
pub fn forecast_horizon(last_known: NaiveDate, target: NaiveDate) -> usize {
    (target - last_known).num_days().max(0) as usize
}

/// Parse a target (event start or forecast end) date.
///
/// Tries `format` first and falls back to ISO `YYYY-MM-DD`.
pub fn parse_target_date(raw: &str, format: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, format)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT))
        .map_err(|_| ForecastError::InvalidTargetDate {
            value: raw.to_string(),
            format: format.to_string(),
        })
}
