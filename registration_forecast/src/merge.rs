//! Merging the historical series with a partial event series

use crate::error::{ForecastError, Result};
use crate::series::DailySeries;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

/// How to combine counts on dates present in both series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Add the counts together
    Sum,
    /// Keep the partial series' count
    Overwrite,
    /// Fail with [`ForecastError::OverlapAmbiguity`]
    #[default]
    Reject,
}

/// Merge two dense series into one dense series over their union range.
///
/// Days between the end of one series and the start of the other are filled
/// with zero.
pub fn merge_series(historical: &DailySeries, partial: &DailySeries, policy: OverlapPolicy) -> Result<DailySeries> {
    let (Some(h_start), Some(h_end), Some(p_start), Some(p_end)) =
        (historical.start(), historical.end(), partial.start(), partial.end())
    else {
        return Ok(if historical.is_empty() {
            partial.clone()
        } else {
            historical.clone()
        });
    };

    let overlap_first = h_start.max(p_start);
    let overlap_last = h_end.min(p_end);
    if overlap_first <= overlap_last {
        let count = (overlap_last - overlap_first).num_days() as usize + 1;
        match policy {
            OverlapPolicy::Reject => {
                return Err(ForecastError::OverlapAmbiguity {
                    first: overlap_first,
                    last: overlap_last,
                    count,
                });
            }
            OverlapPolicy::Sum | OverlapPolicy::Overwrite => {
                warn!(
                    first = %overlap_first,
                    last = %overlap_last,
                    days = count,
                    policy = ?policy,
                    "historical and partial series overlap"
                );
            }
        }
    }

    let start = h_start.min(p_start);
    let end = h_end.max(p_end);
    let mut counts = vec![0u64; (end - start).num_days() as usize + 1];

    for (date, count) in historical.iter() {
        counts[offset(start, date)] = count;
    }
    for (date, count) in partial.iter() {
        let slot = &mut counts[offset(start, date)];
        let shared = date >= h_start && date <= h_end;
        *slot = match (shared, policy) {
            (true, OverlapPolicy::Sum) => *slot + count,
            _ => count,
        };
    }

    let merged = DailySeries::new(start, counts);
    debug!(
        start = %start,
        end = %end,
        days = merged.len(),
        total = merged.total(),
        "merged historical and partial series"
    );

    Ok(merged)
}

fn offset(start: NaiveDate, date: NaiveDate) -> usize {
    (date - start).num_days() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_side_returns_other() {
        let series = DailySeries::new(date(2024, 1, 1), vec![1, 2]);
        let merged = merge_series(&DailySeries::empty(), &series, OverlapPolicy::Reject).unwrap();
        assert_eq!(merged, series);

        let merged = merge_series(&series, &DailySeries::empty(), OverlapPolicy::Reject).unwrap();
        assert_eq!(merged, series);
    }

    #[test]
    fn partial_before_historical_is_ordered() {
        let historical = DailySeries::new(date(2024, 1, 5), vec![4]);
        let partial = DailySeries::new(date(2024, 1, 1), vec![1, 1]);

        let merged = merge_series(&historical, &partial, OverlapPolicy::Reject).unwrap();

        assert_eq!(merged.start(), Some(date(2024, 1, 1)));
        assert_eq!(merged.counts(), &[1, 1, 0, 0, 4]);
    }
}
