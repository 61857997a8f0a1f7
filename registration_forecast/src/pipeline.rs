//! End-to-end forecast of an event's registrations

use crate::aggregate::{DailyAggregator, DroppedRow, MalformedRowPolicy};
use crate::config::ForecastConfig;
use crate::data::{load_historical, RecordLoader, RegistrationRecord, TableSpec, DEFAULT_DATE_FORMAT};
use crate::error::{ForecastError, Result};
use crate::horizon::{forecast_horizon, parse_target_date};
use crate::merge::{merge_series, OverlapPolicy};
use crate::models::{ForecastResult, ForecastStrategy};
use crate::postprocess::{sanitize, summarize, Summary, UpperBoundPolicy};
use crate::series::DailySeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Per-request settings of a [`Pipeline`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub table: TableSpec,
    pub target_date_format: String,
    pub overlap_policy: OverlapPolicy,
    pub upper_bound_policy: UpperBoundPolicy,
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            table: TableSpec::default(),
            target_date_format: DEFAULT_DATE_FORMAT.to_string(),
            overlap_policy: OverlapPolicy::default(),
            upper_bound_policy: UpperBoundPolicy::default(),
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

/// One row of the plot-ready output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotRow {
    pub date: NaiveDate,
    /// Observed count, absent for future dates
    pub actual: Option<u64>,
    pub forecast: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Everything a forecast run produced
#[derive(Debug, Clone)]
pub struct ForecastReport {
    merged: DailySeries,
    raw: ForecastResult,
    sanitized: ForecastResult,
    summary: Summary,
    horizon: usize,
    last_known: NaiveDate,
    target: NaiveDate,
    dropped: Vec<DroppedRow>,
}

impl ForecastReport {
    /// Historical and partial registrations combined
    pub fn merged(&self) -> &DailySeries {
        &self.merged
    }

    /// Forecast as produced by the strategy
    pub fn raw_forecast(&self) -> &ForecastResult {
        &self.raw
    }

    /// Forecast with negative values clamped
    pub fn forecast(&self) -> &ForecastResult {
        &self.sanitized
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Days forecast past the last known date
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn last_known(&self) -> NaiveDate {
        self.last_known
    }

    pub fn target(&self) -> NaiveDate {
        self.target
    }

    /// Partial rows skipped because of malformed dates
    pub fn dropped(&self) -> &[DroppedRow] {
        &self.dropped
    }

    /// Observed counts next to the sanitized forecast, one row per date
    pub fn plot_series(&self) -> Vec<PlotRow> {
        self.sanitized
            .points()
            .iter()
            .map(|p| PlotRow {
                date: p.date,
                actual: self.merged.get(p.date),
                forecast: p.value,
                lower: p.lower,
                upper: p.upper,
            })
            .collect()
    }
}

/// Registration forecasting pipeline
///
/// Holds the historical series and a strategy; every call to [`Pipeline::run`]
/// recomputes all derived values from its inputs.
#[derive(Debug)]
pub struct Pipeline {
    historical: DailySeries,
    config: PipelineConfig,
    strategy: Box<dyn ForecastStrategy>,
    historical_dropped: Vec<DroppedRow>,
}

impl Pipeline {
    /// Create a pipeline around an already aggregated historical series
    pub fn new(historical: DailySeries, config: PipelineConfig, strategy: Box<dyn ForecastStrategy>) -> Self {
        Self {
            historical,
            config,
            strategy,
            historical_dropped: Vec::new(),
        }
    }

    /// Load the configured historical files and build the configured strategy
    pub fn from_config(config: &ForecastConfig) -> Result<Self> {
        config.validate()?;
        let strategy = config.build_strategy()?;

        let records = load_historical(&config.historical_files, &config.table)?;
        let aggregation = DailyAggregator::new(&config.table.date_format)
            .with_policy(config.malformed_rows)
            .aggregate(&records)?;

        info!(
            files = config.historical_files.len(),
            records = records.len(),
            days = aggregation.series.len(),
            total = aggregation.series.total(),
            dropped = aggregation.dropped.len(),
            "loaded historical registrations"
        );

        let mut pipeline = Self::new(aggregation.series, config.pipeline_config(), strategy);
        pipeline.historical_dropped = aggregation.dropped;
        Ok(pipeline)
    }

    pub fn historical(&self) -> &DailySeries {
        &self.historical
    }

    /// Historical rows skipped because of malformed dates
    pub fn historical_dropped(&self) -> &[DroppedRow] {
        &self.historical_dropped
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Name of the forecasting strategy
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Forecast total registrations up to `target` from the partial event records
    pub fn run(&self, partial: &[RegistrationRecord], target: NaiveDate) -> Result<ForecastReport> {
        let aggregation = DailyAggregator::new(&self.config.table.date_format)
            .with_policy(self.config.malformed_rows)
            .aggregate(partial)?;
        if !aggregation.dropped.is_empty() {
            warn!(
                dropped = aggregation.dropped.len(),
                "partial event data contained malformed dates"
            );
        }

        let partial_series = aggregation.series;
        if partial_series.is_empty() {
            return Err(ForecastError::EmptySeries(
                "partial event data has no valid registration dates".to_string(),
            ));
        }

        let merged = merge_series(&self.historical, &partial_series, self.config.overlap_policy)?;
        let last_known = merged
            .end()
            .ok_or_else(|| ForecastError::EmptySeries("merged series is empty".to_string()))?;
        let horizon = forecast_horizon(last_known, target);
        debug!(last_known = %last_known, target = %target, horizon, "computed forecast horizon");

        let mut raw = self.strategy.fit_and_forecast(&merged, horizon)?;
        if target < last_known && self.strategy.stops_at_target() {
            raw = raw.truncated(target);
        }
        let sanitized = sanitize(&raw, self.config.upper_bound_policy);
        let summary = summarize(&sanitized, &merged, &partial_series);

        info!(
            strategy = self.strategy.name(),
            horizon,
            total_predicted = summary.total_predicted,
            total_actual_plus_forecast = summary.total_actual_plus_forecast,
            event_actual_plus_forecast = summary.event_actual_plus_forecast,
            "forecast complete"
        );

        Ok(ForecastReport {
            merged,
            raw,
            sanitized,
            summary,
            horizon,
            last_known,
            target,
            dropped: aggregation.dropped,
        })
    }

    /// Load partial records from a `.csv`/`.xlsx` file and run the forecast
    pub fn run_file<P: AsRef<Path>>(&self, path: P, raw_target: &str) -> Result<ForecastReport> {
        let target = parse_target_date(raw_target, &self.config.target_date_format)?;
        let records = RecordLoader::from_path(path, &self.config.table)?;
        self.run(&records, target)
    }
}
