//! # Regcast
//!
//! Workspace facade for the registration forecasting crates.
//!
//! - [`registration_forecast`]: loading, aggregation, merging, forecasting and
//!   summarizing of event registrations
//! - [`series_math`]: numeric kernels used by the forecasting strategies
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use regcast_workspace::registration_forecast::{DailySeries, Pipeline, PipelineConfig};
//! use regcast_workspace::registration_forecast::{ArimaStrategy, RegistrationRecord};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let historical = DailySeries::new(start, vec![3; 30]);
//! let pipeline = Pipeline::new(
//!     historical,
//!     PipelineConfig::default(),
//!     Box::new(ArimaStrategy::new(1, 1).unwrap()),
//! );
//!
//! let partial = vec![
//!     RegistrationRecord::new("31/01/2024", "event.csv", 1),
//!     RegistrationRecord::new("01/02/2024 10:30", "event.csv", 2),
//! ];
//! let target = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
//!
//! let report = pipeline.run(&partial, target).unwrap();
//! assert_eq!(report.horizon(), 14);
//! assert_eq!(report.summary().event_actual, 2);
//! ```

pub use registration_forecast;
pub use series_math;

/// Forecast registrations with the default configuration.
///
/// Convenience wrapper for callers that only have a historical series and
/// partial records.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use regcast_workspace::forecast_with_defaults;
/// use regcast_workspace::registration_forecast::{DailySeries, RegistrationRecord};
///
/// let historical = DailySeries::new(NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(), vec![2; 40]);
/// let partial = vec![RegistrationRecord::new("11/12/2023", "event.csv", 1)];
/// let target = NaiveDate::from_ymd_opt(2023, 12, 20).unwrap();
///
/// let summary = forecast_with_defaults(historical, &partial, target).unwrap();
/// assert_eq!(summary.event_actual, 1);
/// ```
pub fn forecast_with_defaults(
    historical: registration_forecast::DailySeries,
    partial: &[registration_forecast::RegistrationRecord],
    target: chrono::NaiveDate,
) -> registration_forecast::Result<registration_forecast::Summary> {
    use registration_forecast::{DecompositionStrategy, Pipeline, PipelineConfig};

    let pipeline = Pipeline::new(historical, PipelineConfig::default(), Box::new(DecompositionStrategy::new()));
    Ok(*pipeline.run(partial, target)?.summary())
}
