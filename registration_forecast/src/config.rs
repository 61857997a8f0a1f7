//! TOML configuration for the forecasting pipeline

use crate::aggregate::MalformedRowPolicy;
use crate::data::{TableSpec, DEFAULT_DATE_FORMAT};
use crate::error::{ForecastError, Result};
use crate::merge::OverlapPolicy;
use crate::models::decomposition::SeasonalitySetting;
use crate::models::{ArimaStrategy, DecompositionStrategy, ForecastStrategy, StrategyKind};
use crate::pipeline::PipelineConfig;
use crate::postprocess::UpperBoundPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Registration tables of past events, aggregated once at startup
    pub historical_files: Vec<PathBuf>,
    /// Date column and format of input tables
    pub table: TableSpec,
    /// Format of the target date argument
    pub target_date_format: String,
    pub strategy: StrategyKind,
    pub overlap_policy: OverlapPolicy,
    pub upper_bound_policy: UpperBoundPolicy,
    pub malformed_rows: MalformedRowPolicy,
    pub decomposition: DecompositionConfig,
    pub arima: ArimaConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            historical_files: Vec::new(),
            table: TableSpec::default(),
            target_date_format: DEFAULT_DATE_FORMAT.to_string(),
            strategy: StrategyKind::default(),
            overlap_policy: OverlapPolicy::default(),
            upper_bound_policy: UpperBoundPolicy::default(),
            malformed_rows: MalformedRowPolicy::default(),
            decomposition: DecompositionConfig::default(),
            arima: ArimaConfig::default(),
        }
    }
}

/// Hyperparameters of the decomposition strategy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecompositionConfig {
    pub interval_width: f64,
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub changepoint_prior_scale: f64,
    pub seasonality_prior_scale: f64,
    pub weekly_seasonality: SeasonalitySetting,
    pub yearly_seasonality: SeasonalitySetting,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            interval_width: 0.8,
            n_changepoints: 25,
            changepoint_range: 0.8,
            changepoint_prior_scale: 0.05,
            seasonality_prior_scale: 10.0,
            weekly_seasonality: SeasonalitySetting::Auto,
            yearly_seasonality: SeasonalitySetting::Auto,
        }
    }
}

impl DecompositionConfig {
    fn strategy(&self) -> DecompositionStrategy {
        DecompositionStrategy::new()
            .with_interval_width(self.interval_width)
            .with_changepoints(self.n_changepoints)
            .with_changepoint_range(self.changepoint_range)
            .with_changepoint_prior_scale(self.changepoint_prior_scale)
            .with_seasonality_prior_scale(self.seasonality_prior_scale)
            .with_weekly_seasonality(self.weekly_seasonality)
            .with_yearly_seasonality(self.yearly_seasonality)
    }
}

/// Order of the ARIMA strategy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArimaConfig {
    pub p: usize,
    pub d: usize,
    pub include_constant: bool,
}

impl Default for ArimaConfig {
    fn default() -> Self {
        Self {
            p: 5,
            d: 1,
            include_constant: false,
        }
    }
}

impl ArimaConfig {
    fn strategy(&self) -> Result<ArimaStrategy> {
        Ok(ArimaStrategy::new(self.p, self.d)?.with_constant(self.include_constant))
    }
}

impl ForecastConfig {
    /// Parse a configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    ///
    /// Relative historical file paths are resolved against the directory
    /// containing the configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            for file in config.historical_files.iter_mut() {
                if file.is_relative() {
                    *file = base.join(&*file);
                }
            }
        }
        Ok(config)
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> Result<()> {
        if self.table.date_column.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "table.date_column must not be empty".to_string(),
            ));
        }
        if self.table.date_format.is_empty() || self.target_date_format.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "date formats must not be empty".to_string(),
            ));
        }

        self.decomposition.strategy().validate()?;
        self.arima.strategy()?;
        Ok(())
    }

    /// Strategy selected by `strategy`
    pub fn build_strategy(&self) -> Result<Box<dyn ForecastStrategy>> {
        Ok(match self.strategy {
            StrategyKind::Decomposition => {
                let strategy = self.decomposition.strategy();
                strategy.validate()?;
                Box::new(strategy)
            }
            StrategyKind::Arima => Box::new(self.arima.strategy()?),
        })
    }

    /// Settings the pipeline needs per request
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            table: self.table.clone(),
            target_date_format: self.target_date_format.clone(),
            overlap_policy: self.overlap_policy,
            upper_bound_policy: self.upper_bound_policy,
            malformed_rows: self.malformed_rows,
        }
    }
}
