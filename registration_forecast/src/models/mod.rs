//! Forecasting strategies for daily registration series

use crate::error::{ForecastError, Result};
use crate::series::DailySeries;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod arima;
pub mod decomposition;

pub use arima::ArimaStrategy;
pub use decomposition::DecompositionStrategy;

/// One forecast value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// Calendar day of the estimate
    pub date: NaiveDate,
    /// Central estimate
    pub value: f64,
    /// Lower uncertainty bound (optional)
    pub lower: Option<f64>,
    /// Upper uncertainty bound (optional)
    pub upper: Option<f64>,
}

impl ForecastPoint {
    /// Create a point estimate without bounds
    pub fn point(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value,
            lower: None,
            upper: None,
        }
    }

    /// Create an estimate with an uncertainty band
    pub fn with_bounds(date: NaiveDate, value: f64, lower: f64, upper: f64) -> Self {
        Self {
            date,
            value,
            lower: Some(lower),
            upper: Some(upper),
        }
    }
}

/// Forecast covering the fitted history and the extrapolated future
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Name of the strategy that produced the forecast
    model: String,
    /// Last date with observed data; later points are extrapolated
    last_observed: NaiveDate,
    /// Estimates in ascending date order
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(model: impl Into<String>, last_observed: NaiveDate, points: Vec<ForecastPoint>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::ModelFit(format!(
                "Forecast dates must be strictly increasing ({} followed by {})",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self {
            model: model.into(),
            last_observed,
            points,
        })
    }

    /// Name of the producing strategy
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Last date with observed data
    pub fn last_observed(&self) -> NaiveDate {
        self.last_observed
    }

    /// All estimates
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Central estimates
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Estimates strictly after the last observed date
    pub fn future(&self) -> impl Iterator<Item = &ForecastPoint> {
        let boundary = self.last_observed;
        self.points.iter().filter(move |p| p.date > boundary)
    }

    /// Estimates on or before the last observed date
    pub fn history(&self) -> impl Iterator<Item = &ForecastPoint> {
        let boundary = self.last_observed;
        self.points.iter().filter(move |p| p.date <= boundary)
    }

    /// Whether any estimate carries an uncertainty band
    pub fn has_intervals(&self) -> bool {
        self.points.iter().any(|p| p.lower.is_some() || p.upper.is_some())
    }

    /// Number of estimates
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the forecast is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Estimates up to and including `end`
    pub fn truncated(&self, end: NaiveDate) -> Self {
        let points = self.points.iter().filter(|p| p.date <= end).copied().collect();
        self.with_points(points)
    }

    /// Replace the estimates, keeping model name and boundary
    pub fn with_points(&self, points: Vec<ForecastPoint>) -> Self {
        Self {
            model: self.model.clone(),
            last_observed: self.last_observed,
            points,
        }
    }
}

/// Shared contract of the forecasting strategies.
///
/// A strategy is a fixed configuration: every call fits a fresh model to
/// `series` and returns estimates for each day of the series followed by
/// `horizon` future days.
pub trait ForecastStrategy: Debug + Send + Sync {
    /// Fit to the full series and forecast `horizon` days past its end
    fn fit_and_forecast(&self, series: &DailySeries, horizon: usize) -> Result<ForecastResult>;

    /// Name of the strategy
    fn name(&self) -> &str;

    /// Whether output stops at a target date that precedes the series end
    fn stops_at_target(&self) -> bool {
        false
    }
}

/// Which strategy a configuration selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Additive trend plus seasonality
    #[default]
    Decomposition,
    /// Autoregressive integrated model
    Arima,
}

impl std::str::FromStr for StrategyKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decomposition" | "prophet" => Ok(StrategyKind::Decomposition),
            "arima" => Ok(StrategyKind::Arima),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown strategy '{}': expected 'decomposition' or 'arima'",
                other
            ))),
        }
    }
}

/// Dates `start, start + 1, ...` for `len` days
pub(crate) fn date_range(start: NaiveDate, len: usize) -> Vec<NaiveDate> {
    (0..len).map(|i| start + Days::new(i as u64)).collect()
}

/// Fail with [`ForecastError::ModelFit`] if any estimate is NaN or infinite
pub(crate) fn ensure_finite(model: &str, points: &[ForecastPoint]) -> Result<()> {
    let bad = points.iter().find(|p| {
        !p.value.is_finite()
            || p.lower.is_some_and(|v| !v.is_finite())
            || p.upper.is_some_and(|v| !v.is_finite())
    });

    match bad {
        Some(p) => Err(ForecastError::ModelFit(format!(
            "{} produced a non-finite estimate for {}",
            model, p.date
        ))),
        None => Ok(()),
    }
}
