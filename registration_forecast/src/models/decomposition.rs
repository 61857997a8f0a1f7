//! Additive trend plus seasonality model
//!
//! The series is modelled as
//!
//! ```text
//! y(t) = k·t + m + Σ δⱼ·(t − sⱼ)₊ + Σ Fourier terms + ε
//! ```
//!
//! where `sⱼ` are potential trend changepoints spread over the early part of
//! the history. All coefficients come from a single penalized least squares
//! solve on the max-scaled response: rate changes `δ` are shrunk hard,
//! seasonal coefficients barely at all.

use crate::error::{ForecastError, Result};
use crate::models::{date_range, ensure_finite, ForecastPoint, ForecastResult, ForecastStrategy};
use crate::series::DailySeries;
use serde::Deserialize;
use series_math::{fourier_terms, penalized_least_squares};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Minimum number of daily observations
const MIN_OBSERVATIONS: usize = 2;

/// History span (days) from which weekly seasonality is switched on
const WEEKLY_MIN_SPAN: f64 = 14.0;

/// History span (days) from which yearly seasonality is switched on
const YEARLY_MIN_SPAN: f64 = 730.0;

/// Whether a seasonal component is fitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalitySetting {
    /// Fit it when the history is long enough
    #[default]
    Auto,
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy)]
struct Seasonality {
    name: &'static str,
    period: f64,
    order: usize,
}

const WEEKLY: Seasonality = Seasonality {
    name: "weekly",
    period: 7.0,
    order: 3,
};

const YEARLY: Seasonality = Seasonality {
    name: "yearly",
    period: 365.25,
    order: 10,
};

/// Decomposable trend + seasonality forecasting strategy
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionStrategy {
    /// Coverage of the uncertainty band
    interval_width: f64,
    /// Maximum number of potential trend changepoints
    n_changepoints: usize,
    /// Share of the history in which changepoints may be placed
    changepoint_range: f64,
    /// Prior scale of trend rate changes
    changepoint_prior_scale: f64,
    /// Prior scale of Fourier coefficients
    seasonality_prior_scale: f64,
    weekly: SeasonalitySetting,
    yearly: SeasonalitySetting,
}

impl Default for DecompositionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl DecompositionStrategy {
    /// Create a strategy with the conventional defaults
    pub fn new() -> Self {
        Self {
            interval_width: 0.80,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            weekly: SeasonalitySetting::Auto,
            yearly: SeasonalitySetting::Auto,
        }
    }

    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    pub fn with_changepoints(mut self, n: usize) -> Self {
        self.n_changepoints = n;
        self
    }

    pub fn with_changepoint_range(mut self, range: f64) -> Self {
        self.changepoint_range = range;
        self
    }

    pub fn with_changepoint_prior_scale(mut self, scale: f64) -> Self {
        self.changepoint_prior_scale = scale;
        self
    }

    pub fn with_seasonality_prior_scale(mut self, scale: f64) -> Self {
        self.seasonality_prior_scale = scale;
        self
    }

    pub fn with_weekly_seasonality(mut self, setting: SeasonalitySetting) -> Self {
        self.weekly = setting;
        self
    }

    pub fn with_yearly_seasonality(mut self, setting: SeasonalitySetting) -> Self {
        self.yearly = setting;
        self
    }

    /// Coverage of the uncertainty band
    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    /// Check hyperparameters
    pub fn validate(&self) -> Result<()> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "interval_width must be between 0 and 1, got {}",
                self.interval_width
            )));
        }
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        if !(self.changepoint_prior_scale > 0.0) || !(self.seasonality_prior_scale > 0.0) {
            return Err(ForecastError::InvalidParameter(
                "prior scales must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Changepoint locations (scaled time) spread evenly over the early history
    fn changepoints(&self, t_hist: &[f64]) -> Vec<f64> {
        let hist_size = (t_hist.len() as f64 * self.changepoint_range).floor() as usize;
        let count = self.n_changepoints.min(hist_size.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }

        let step = (hist_size - 1) as f64 / count as f64;
        (1..=count)
            .map(|j| t_hist[(j as f64 * step).round() as usize])
            .collect()
    }

    fn seasonalities(&self, span_days: f64) -> Vec<Seasonality> {
        let active = |setting: SeasonalitySetting, min_span: f64| match setting {
            SeasonalitySetting::Auto => span_days >= min_span,
            SeasonalitySetting::Enabled => true,
            SeasonalitySetting::Disabled => false,
        };

        let mut result = Vec::new();
        if active(self.weekly, WEEKLY_MIN_SPAN) {
            result.push(WEEKLY);
        }
        if active(self.yearly, YEARLY_MIN_SPAN) {
            result.push(YEARLY);
        }
        result
    }
}

impl ForecastStrategy for DecompositionStrategy {
    fn fit_and_forecast(&self, series: &DailySeries, horizon: usize) -> Result<ForecastResult> {
        self.validate()?;

        let n = series.len();
        let (Some(start), Some(last_observed)) = (series.start(), series.end()) else {
            return Err(ForecastError::ModelFit(
                "Decomposition model cannot be fitted to an empty series".to_string(),
            ));
        };
        if n < MIN_OBSERVATIONS {
            return Err(ForecastError::ModelFit(format!(
                "Decomposition model needs at least {} observations, got {}",
                MIN_OBSERVATIONS, n
            )));
        }

        let y = series.values();
        let y_scale = match y.iter().fold(0.0_f64, |m, v| m.max(v.abs())) {
            m if m > 0.0 => m,
            _ => 1.0,
        };
        let y_scaled: Vec<f64> = y.iter().map(|v| v / y_scale).collect();

        // Time in days since start, and rescaled so the history spans [0, 1].
        let total = n + horizon;
        let span = (n - 1) as f64;
        let days: Vec<f64> = (0..total).map(|i| i as f64).collect();
        let t: Vec<f64> = days.iter().map(|d| d / span).collect();

        let changepoints = self.changepoints(&t[..n]);
        let seasonalities = self.seasonalities(span);
        let seasonal_blocks = seasonalities
            .iter()
            .map(|s| fourier_terms(&days, s.period, s.order))
            .collect::<series_math::Result<Vec<_>>>()?;

        let design: Vec<Vec<f64>> = (0..total)
            .map(|i| {
                let mut row = vec![1.0, t[i]];
                row.extend(changepoints.iter().map(|&c| (t[i] - c).max(0.0)));
                for block in &seasonal_blocks {
                    row.extend_from_slice(&block[i]);
                }
                row
            })
            .collect();

        let n_fourier: usize = seasonalities.iter().map(|s| 2 * s.order).sum();
        let mut penalties = vec![0.0, 0.0];
        penalties.extend(std::iter::repeat(self.changepoint_prior_scale.powi(-2)).take(changepoints.len()));
        penalties.extend(std::iter::repeat(self.seasonality_prior_scale.powi(-2)).take(n_fourier));

        let beta = penalized_least_squares(&design[..n], &y_scaled, &penalties)?;
        let fitted: Vec<f64> = design
            .iter()
            .map(|row| row.iter().zip(&beta).map(|(x, b)| x * b).sum())
            .collect();

        let sigma2 = fitted[..n]
            .iter()
            .zip(&y_scaled)
            .map(|(f, y)| (y - f).powi(2))
            .sum::<f64>()
            / n as f64;

        // Future rate changes arrive at the historical changepoint frequency
        // with Laplace magnitude of the mean fitted |δ|.
        let deltas = &beta[2..2 + changepoints.len()];
        let delta_scale = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().map(|d| d.abs()).sum::<f64>() / deltas.len() as f64
        };
        let changepoint_rate = changepoints.len() as f64;

        let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::ModelFit(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + self.interval_width / 2.0);

        let points: Vec<ForecastPoint> = date_range(start, total)
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let ahead = (t[i] - 1.0).max(0.0);
                let trend_var = changepoint_rate * 2.0 * delta_scale.powi(2) * ahead.powi(3) / 3.0;
                let half_width = z * (sigma2 + trend_var).sqrt();
                ForecastPoint::with_bounds(
                    date,
                    fitted[i] * y_scale,
                    (fitted[i] - half_width) * y_scale,
                    (fitted[i] + half_width) * y_scale,
                )
            })
            .collect();

        ensure_finite(self.name(), &points)?;

        debug!(
            observations = n,
            horizon,
            changepoints = changepoints.len(),
            seasonalities = ?seasonalities.iter().map(|s| s.name).collect::<Vec<_>>(),
            sigma = sigma2.sqrt() * y_scale,
            "fitted decomposition model"
        );

        ForecastResult::new(self.name(), last_observed, points)
    }

    fn name(&self) -> &str {
        "Decomposition"
    }
}
