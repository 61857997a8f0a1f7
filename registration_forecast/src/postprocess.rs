//! Post-processing of raw forecasts and summary figures

use crate::models::{ForecastPoint, ForecastResult};
use crate::series::DailySeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caveat shown next to the predicted total
pub const DISCLAIMER: &str = "This is just an estimate. The actual number can be +/- 20% of this number.";

/// How upper uncertainty bounds are treated when clamping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBoundPolicy {
    /// Clamp negative upper bounds to zero, like values and lower bounds
    #[default]
    ClampNegative,
    /// Leave upper bounds as produced by the model
    Untouched,
}

/// Replace negative values with zero
pub fn clamp_non_negative(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.max(0.0)).collect()
}

/// Clamp central estimates and lower bounds at zero
pub fn sanitize(forecast: &ForecastResult, policy: UpperBoundPolicy) -> ForecastResult {
    let points = forecast
        .points()
        .iter()
        .map(|p| ForecastPoint {
            date: p.date,
            value: p.value.max(0.0),
            lower: p.lower.map(|v| v.max(0.0)),
            upper: match policy {
                UpperBoundPolicy::ClampNegative => p.upper.map(|v| v.max(0.0)),
                UpperBoundPolicy::Untouched => p.upper,
            },
        })
        .collect();

    forecast.with_points(points)
}

/// Headline figures of a forecast run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Predicted registrations after the last known date
    pub total_predicted: u64,
    /// Every registration in the merged series plus the prediction
    pub total_actual_plus_forecast: u64,
    /// Registrations of the current event so far
    pub event_actual: u64,
    /// Current event registrations plus the prediction
    pub event_actual_plus_forecast: u64,
}

impl Summary {
    /// Line for display in the user interface
    pub fn display_line(&self) -> String {
        format!("Total predicted registrations: {}", self.total_predicted)
    }

    /// Accuracy caveat accompanying the display line
    pub fn disclaimer(&self) -> &'static str {
        DISCLAIMER
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_line())
    }
}

/// Compute summary figures from a sanitized forecast.
///
/// Only estimates strictly after the forecast's last observed date count
/// towards the prediction; the sum is truncated to whole registrations.
pub fn summarize(sanitized: &ForecastResult, merged: &DailySeries, partial: &DailySeries) -> Summary {
    let future_sum: f64 = sanitized.future().map(|p| p.value.max(0.0)).sum();
    let total_predicted = future_sum.floor() as u64;
    let event_actual = partial.total();

    Summary {
        total_predicted,
        total_actual_plus_forecast: merged.total() + total_predicted,
        event_actual,
        event_actual_plus_forecast: event_actual + total_predicted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn clamps_negative_values() {
        assert_eq!(
            clamp_non_negative(&[-5.0, 0.0, 3.0, -0.5, 10.0]),
            vec![0.0, 0.0, 3.0, 0.0, 10.0]
        );
    }

    #[test]
    fn upper_bound_policy() {
        let points = vec![ForecastPoint::with_bounds(date(1), -2.0, -4.0, -1.0)];
        let forecast = ForecastResult::new("test", date(1), points).unwrap();

        let clamped = sanitize(&forecast, UpperBoundPolicy::ClampNegative);
        assert_eq!(clamped.points()[0].value, 0.0);
        assert_eq!(clamped.points()[0].lower, Some(0.0));
        assert_eq!(clamped.points()[0].upper, Some(0.0));

        let untouched = sanitize(&forecast, UpperBoundPolicy::Untouched);
        assert_eq!(untouched.points()[0].lower, Some(0.0));
        assert_eq!(untouched.points()[0].upper, Some(-1.0));
    }

    #[test]
    fn summary_display() {
        let summary = Summary {
            total_predicted: 42,
            total_actual_plus_forecast: 100,
            event_actual: 58,
            event_actual_plus_forecast: 100,
        };
        assert_eq!(summary.to_string(), "Total predicted registrations: 42");
        assert!(summary.disclaimer().contains("+/- 20%"));
    }
}
