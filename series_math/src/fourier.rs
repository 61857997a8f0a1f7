//! Fourier basis for periodic components

use crate::{MathError, Result};
use std::f64::consts::PI;

/// Build Fourier features for a seasonal period.
///
/// Returns one row per time point with `2 * order` columns laid out as
/// `[sin(1), cos(1), sin(2), cos(2), ...]`. Times and period share a unit
/// (days in this workspace).
pub fn fourier_terms(t: &[f64], period: f64, order: usize) -> Result<Vec<Vec<f64>>> {
    if period <= 0.0 || !period.is_finite() {
        return Err(MathError::InvalidInput(format!(
            "Seasonal period must be positive, got {}",
            period
        )));
    }

    Ok(t.iter()
        .map(|&ti| {
            let mut row = Vec::with_capacity(2 * order);
            for k in 1..=order {
                let angle = 2.0 * PI * k as f64 * ti / period;
                row.push(angle.sin());
                row.push(angle.cos());
            }
            row
        })
        .collect())
}
