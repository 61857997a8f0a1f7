//! # Series Math
//!
//! Numeric kernels shared by the registration forecasting models.
//! This crate provides penalized least squares, differencing and
//! Fourier seasonality terms over plain `f64` slices.

use thiserror::Error;

pub mod differencing;
pub mod fourier;
pub mod linalg;

pub use differencing::{difference, integrate};
pub use fourier::fourier_terms;
pub use linalg::{penalized_least_squares, solve_symmetric};

/// Errors that can occur in numeric series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
