//! ARIMA models for daily registration counts

use crate::error::{ForecastError, Result};
use crate::models::{date_range, ensure_finite, ForecastPoint, ForecastResult, ForecastStrategy};
use crate::series::DailySeries;
use series_math::{difference, integrate, penalized_least_squares};
use tracing::debug;

/// Highest supported differencing order
const MAX_DIFFERENCING: usize = 2;

/// ARIMA(p, d, 0) model (AutoRegressive Integrated, no moving average part)
///
/// The AR coefficients are fitted by conditional least squares on the
/// `d`-times differenced series. Produces point estimates only.
#[derive(Debug, Clone, PartialEq)]
pub struct ArimaStrategy {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// Fit an intercept on the differenced scale
    include_constant: bool,
}

impl Default for ArimaStrategy {
    fn default() -> Self {
        Self {
            name: "ARIMA(5,1,0)".to_string(),
            p: 5,
            d: 1,
            include_constant: false,
        }
    }
}

impl ArimaStrategy {
    /// Create a new ARIMA(p, d, 0) model
    pub fn new(p: usize, d: usize) -> Result<Self> {
        if d > MAX_DIFFERENCING {
            return Err(ForecastError::InvalidParameter(format!(
                "Differencing order must be at most {}, got {}",
                MAX_DIFFERENCING, d
            )));
        }

        Ok(Self {
            name: format!("ARIMA({},{},0)", p, d),
            p,
            d,
            include_constant: false,
        })
    }

    /// Fit an intercept (drift, when `d = 1`)
    pub fn with_constant(mut self, include_constant: bool) -> Self {
        self.include_constant = include_constant;
        self
    }

    /// Model order as `(p, d, q)`
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, 0)
    }

    fn n_coefficients(&self) -> usize {
        self.p + usize::from(self.include_constant)
    }

    /// Smallest series length the model can be fitted to
    pub fn min_observations(&self) -> usize {
        self.d + self.n_coefficients().max(1)
    }

    /// Lagged regressors for predicting `w[t]`; lags before the start count as zero
    fn regressors(&self, w: &[f64], t: usize) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.n_coefficients());
        if self.include_constant {
            row.push(1.0);
        }
        row.extend((1..=self.p).map(|lag| if t >= lag { w[t - lag] } else { 0.0 }));
        row
    }

    fn predict(&self, coefficients: &[f64], w: &[f64], t: usize) -> f64 {
        self.regressors(w, t)
            .iter()
            .zip(coefficients)
            .map(|(x, c)| x * c)
            .sum()
    }

    fn fit_coefficients(&self, w: &[f64]) -> Result<Vec<f64>> {
        let k = self.n_coefficients();
        if k == 0 {
            return Ok(Vec::new());
        }

        // Rows start once all p lags are observed; short series fall back to
        // zero pre-sample lags so there are at least k rows.
        let first = self.p.min(w.len().saturating_sub(k));
        let design: Vec<Vec<f64>> = (first..w.len()).map(|t| self.regressors(w, t)).collect();
        let targets = &w[first..];

        Ok(penalized_least_squares(&design, targets, &vec![0.0; k])?)
    }
}

impl ForecastStrategy for ArimaStrategy {
    fn fit_and_forecast(&self, series: &DailySeries, horizon: usize) -> Result<ForecastResult> {
        let n = series.len();
        let (Some(start), Some(last_observed)) = (series.start(), series.end()) else {
            return Err(ForecastError::ModelFit(format!(
                "{} cannot be fitted to an empty series",
                self.name
            )));
        };
        if n < self.min_observations() {
            return Err(ForecastError::ModelFit(format!(
                "{} needs at least {} observations, got {}",
                self.name,
                self.min_observations(),
                n
            )));
        }

        let y = series.values();
        let w = difference(&y, self.d);
        let coefficients = self.fit_coefficients(&w)?;

        // One-step-ahead in-sample estimates; the first d days have no
        // differenced value and are reproduced as observed.
        let mut values: Vec<f64> = Vec::with_capacity(n + horizon);
        values.extend_from_slice(&y[..self.d]);
        values.extend((0..w.len()).map(|j| {
            let t = j + self.d;
            y[t] - w[j] + self.predict(&coefficients, &w, j)
        }));

        let mut extended = w.clone();
        for _ in 0..horizon {
            let next = self.predict(&coefficients, &extended, extended.len());
            extended.push(next);
        }
        values.extend(integrate(&extended[w.len()..], &y, self.d));

        let points: Vec<ForecastPoint> = date_range(start, n + horizon)
            .into_iter()
            .zip(values)
            .map(|(date, value)| ForecastPoint::point(date, value))
            .collect();

        ensure_finite(&self.name, &points)?;

        debug!(
            model = %self.name,
            observations = n,
            horizon,
            coefficients = ?coefficients,
            "fitted ARIMA model"
        );

        ForecastResult::new(self.name.clone(), last_observed, points)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn stops_at_target(&self) -> bool {
        true
    }
}
