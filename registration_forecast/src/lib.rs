//! # Registration Forecast
//!
//! A Rust library for forecasting the total number of registrations of an
//! event from its partial registration data and the registrations of past
//! events.
//!
//! ## Features
//!
//! - Registration table loading (CSV via polars, XLSX via calamine)
//! - Daily aggregation into gap-free count series
//! - Merging of historical and partial series with an explicit overlap policy
//! - Forecasting strategies (trend + seasonality decomposition, ARIMA)
//! - Post-processing into non-negative forecasts and headline totals
//! - Plot-ready output and CSV export
//!
//! ## Pipeline
//!
//! ```text
//! records ─► DailyAggregator ─► merge_series ─► forecast_horizon
//!                                                      │
//!         Summary ◄─ summarize ◄─ sanitize ◄─ ForecastStrategy
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use registration_forecast::config::ForecastConfig;
//! use registration_forecast::pipeline::Pipeline;
//!
//! // Load configuration and the historical registrations it lists
//! let config = ForecastConfig::from_file("regcast.toml")?;
//! let pipeline = Pipeline::from_config(&config)?;
//!
//! // Forecast the current event up to its start date
//! let report = pipeline.run_file("current_event.csv", "01/06/2024")?;
//!
//! println!("{}", report.summary().display_line());
//! println!("{}", report.summary().disclaimer());
//! # Ok::<(), registration_forecast::ForecastError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod horizon;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod postprocess;
pub mod series;

// Re-export commonly used types
pub use crate::aggregate::{DailyAggregator, MalformedRowPolicy};
pub use crate::config::ForecastConfig;
pub use crate::data::{RecordLoader, RegistrationRecord, TableSpec};
pub use crate::error::{ForecastError, Result};
pub use crate::merge::{merge_series, OverlapPolicy};
pub use crate::models::{ArimaStrategy, DecompositionStrategy, ForecastResult, ForecastStrategy, StrategyKind};
pub use crate::pipeline::{ForecastReport, Pipeline, PipelineConfig, PlotRow};
pub use crate::postprocess::{Summary, UpperBoundPolicy};
pub use crate::series::DailySeries;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
