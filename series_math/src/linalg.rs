//! Dense least squares for small design matrices
//!
//! The models in this workspace fit at most a few dozen coefficients, so the
//! normal equations are formed explicitly and solved with a Cholesky
//! factorization.

use crate::{MathError, Result};

/// Diagonal jitter added to the normal matrix for numerical stability
const DIAGONAL_JITTER: f64 = 1e-10;

/// Fit `y ≈ X β` minimizing `‖y − Xβ‖² + Σ penalties[j]·β[j]²`.
///
/// `design` holds one row per observation. A penalty of `0.0` leaves the
/// matching coefficient unregularized.
pub fn penalized_least_squares(design: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    if design.is_empty() {
        return Err(MathError::InsufficientData(
            "Least squares needs at least one observation".to_string(),
        ));
    }

    if design.len() != y.len() {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but response has {} values",
            design.len(),
            y.len()
        )));
    }

    let k = penalties.len();
    if k == 0 {
        return Err(MathError::InvalidInput(
            "Least squares needs at least one coefficient".to_string(),
        ));
    }

    if let Some(bad) = design.iter().position(|row| row.len() != k) {
        return Err(MathError::InvalidInput(format!(
            "Design row {} has {} columns, expected {}",
            bad,
            design[bad].len(),
            k
        )));
    }

    if y.iter().chain(design.iter().flatten()).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Least squares inputs contain non-finite values".to_string(),
        ));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for (row, &target) in design.iter().zip(y) {
        for i in 0..k {
            let xi = row[i];
            if xi == 0.0 {
                continue;
            }
            xty[i] += xi * target;
            for j in 0..=i {
                xtx[i][j] += xi * row[j];
            }
        }
    }

    for i in 0..k {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
        xtx[i][i] += penalties[i] + DIAGONAL_JITTER;
    }

    solve_symmetric(&xtx, &xty).ok_or_else(|| {
        MathError::CalculationError(
            "Normal equations are singular: matrix not positive definite".to_string(),
        )
    })
}

/// Solve `A x = b` for a symmetric positive definite `A`.
///
/// Returns `None` when the Cholesky factorization breaks down.
pub fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    // A = L Lᵀ
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    let mut z = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * z[j];
        }
        z[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = z[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
