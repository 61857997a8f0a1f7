//! Dense daily count series

use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;

/// Per-day registration counts over a contiguous date range.
///
/// The series is stored as a start date plus one count per consecutive day,
/// so it cannot contain gaps or duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySeries {
    start: Option<NaiveDate>,
    counts: Vec<u64>,
}

impl DailySeries {
    /// Create a series starting at `start` with one count per day
    pub fn new(start: NaiveDate, counts: Vec<u64>) -> Self {
        if counts.is_empty() {
            return Self::empty();
        }

        Self {
            start: Some(start),
            counts,
        }
    }

    /// An empty series
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series from sparse per-date counts, filling absent dates with 0
    pub fn from_counts(counts: &BTreeMap<NaiveDate, u64>) -> Self {
        let (Some((&first, _)), Some((&last, _))) =
            (counts.first_key_value(), counts.last_key_value())
        else {
            return Self::empty();
        };

        let len = (last - first).num_days() as usize + 1;
        let mut dense = vec![0; len];
        for (date, count) in counts {
            dense[(*date - first).num_days() as usize] = *count;
        }

        Self::new(first, dense)
    }

    /// First date of the series
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Last date of the series
    pub fn end(&self) -> Option<NaiveDate> {
        self.start
            .map(|start| start + Days::new(self.counts.len() as u64 - 1))
    }

    /// Number of days covered
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Raw counts, one per day from `start()`
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Counts as floating point model input
    pub fn values(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Count on a given date, if the date is inside the series
    pub fn get(&self, date: NaiveDate) -> Option<u64> {
        let start = self.start?;
        let offset = (date - start).num_days();
        if offset < 0 {
            return None;
        }
        self.counts.get(offset as usize).copied()
    }

    /// Iterate over `(date, count)` pairs in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.start.into_iter().flat_map(move |start| {
            self.counts
                .iter()
                .enumerate()
                .map(move |(i, &count)| (start + Days::new(i as u64), count))
        })
    }

    /// Dates covered by the series
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.iter().map(|(date, _)| date).collect()
    }

    /// The same counts moved forward by `days`
    pub fn shifted(&self, days: u64) -> Self {
        match self.start {
            Some(start) => Self::new(start + Days::new(days), self.counts.clone()),
            None => Self::empty(),
        }
    }
}
