//! Error types for the registration_forecast crate

use chrono::NaiveDate;
use polars::prelude::PolarsError;
use series_math::MathError;
use thiserror::Error;

/// Custom error types for the registration_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A registration row whose date does not match the expected format
    #[error("Malformed date in {file} row {row}: '{value}' does not match format '{format}'")]
    MalformedDate {
        file: String,
        row: usize,
        value: String,
        format: String,
    },

    /// The requested forecast end date could not be parsed
    #[error("Invalid target date '{value}': expected format '{format}'")]
    InvalidTargetDate { value: String, format: String },

    /// No usable observations were left after aggregation
    #[error("Empty series: {0}")]
    EmptySeries(String),

    /// The forecasting model could not be fitted
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Historical and partial series share dates under a rejecting merge policy
    #[error(
        "Historical and partial series overlap on {count} day(s) from {first} to {last}; \
         choose an overlap policy of 'sum' or 'overwrite' to merge them"
    )]
    OverlapAmbiguity {
        first: NaiveDate,
        last: NaiveDate,
        count: usize,
    },

    /// Error related to input table shape or contents
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error reading a spreadsheet
    #[error("Excel error: {0}")]
    ExcelError(String),

    /// Error writing delimited output
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error loading configuration
    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ForecastError {
    fn from(err: calamine::XlsxError) -> Self {
        ForecastError::ExcelError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<toml::de::Error> for ForecastError {
    fn from(err: toml::de::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::ModelFit(err.to_string())
    }
}
