//! Daily aggregation of registration records

use crate::data::{RegistrationRecord, DEFAULT_DATE_FORMAT};
use crate::error::{ForecastError, Result};
use crate::series::DailySeries;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What to do with a record whose date cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedRowPolicy {
    /// Fail the whole aggregation
    #[default]
    Abort,
    /// Drop the row and report it in [`Aggregation::dropped`]
    SkipAndReport,
}

/// A record excluded from the counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRow {
    pub source: String,
    pub row: usize,
    pub value: String,
}

/// Output of an aggregation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Gap-free daily counts
    pub series: DailySeries,
    /// Rows skipped under [`MalformedRowPolicy::SkipAndReport`]
    pub dropped: Vec<DroppedRow>,
}

/// Turns registration records into a dense daily count series
#[derive(Debug, Clone)]
pub struct DailyAggregator {
    date_format: String,
    policy: MalformedRowPolicy,
}

impl Default for DailyAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

impl DailyAggregator {
    /// Create an aggregator for the given chrono date format
    pub fn new(date_format: &str) -> Self {
        Self {
            date_format: date_format.to_string(),
            policy: MalformedRowPolicy::default(),
        }
    }

    /// Set the malformed-row policy
    pub fn with_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Count records per calendar day over the contiguous observed range
    pub fn aggregate(&self, records: &[RegistrationRecord]) -> Result<Aggregation> {
        let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        let mut dropped = Vec::new();

        for record in records {
            match parse_record_date(record.raw_date(), &self.date_format) {
                Some(date) => *per_day.entry(date).or_insert(0) += 1,
                None => match self.policy {
                    MalformedRowPolicy::Abort => {
                        return Err(ForecastError::MalformedDate {
                            file: record.source().to_string(),
                            row: record.row(),
                            value: record.raw_date().to_string(),
                            format: self.date_format.clone(),
                        });
                    }
                    MalformedRowPolicy::SkipAndReport => {
                        warn!(
                            source = record.source(),
                            row = record.row(),
                            value = record.raw_date(),
                            "dropping registration with malformed date"
                        );
                        dropped.push(DroppedRow {
                            source: record.source().to_string(),
                            row: record.row(),
                            value: record.raw_date().to_string(),
                        });
                    }
                },
            }
        }

        let series = DailySeries::from_counts(&per_day);
        debug!(
            records = records.len(),
            dropped = dropped.len(),
            days = series.len(),
            start = ?series.start(),
            end = ?series.end(),
            "aggregated daily registrations"
        );

        Ok(Aggregation { series, dropped })
    }
}

/// Parse the date part of a raw timestamp.
///
/// A trailing time of day, separated by whitespace or `T`, is ignored.
pub fn parse_record_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (date, rest) = NaiveDate::parse_and_remainder(trimmed, format).ok()?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with('T') {
        Some(date)
    } else {
        None
    }
}
