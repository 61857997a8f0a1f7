//! Differencing and integration for integrated autoregressive models

/// Apply `d` rounds of first differencing.
///
/// Each round shortens the series by one value.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `d` rounds of differencing for values that continue `original`.
///
/// `differenced` holds future values on the `d`-times differenced scale; the
/// returned values are on the scale of `original`, continuing from its end.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || differenced.is_empty() {
        return differenced.to_vec();
    }

    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let anchor = difference(original, level).last().copied().unwrap_or(0.0);

        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_difference() {
        assert_eq!(difference(&[1.0, 3.0, 6.0, 10.0], 1), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn second_difference() {
        assert_eq!(difference(&[1.0, 3.0, 6.0, 10.0], 2), vec![1.0, 1.0]);
    }

    #[test]
    fn zero_order_is_identity() {
        assert_eq!(difference(&[4.0, 5.0], 0), vec![4.0, 5.0]);
    }

    #[test]
    fn over_differencing_empties() {
        assert!(difference(&[4.0], 1).is_empty());
        assert!(difference(&[4.0, 5.0], 2).is_empty());
    }

    #[test]
    fn integrate_continues_levels() {
        let original = [10.0, 12.0, 15.0];
        let future = integrate(&[1.0, 2.0], &original, 1);
        assert_relative_eq!(future[0], 16.0);
        assert_relative_eq!(future[1], 18.0);
    }

    #[test]
    fn integrate_second_order() {
        // Quadratic series: second differences are constant 2.
        let original: Vec<f64> = (0..6).map(|i| (i * i) as f64).collect();
        let future = integrate(&[2.0, 2.0], &original, 2);
        assert_relative_eq!(future[0], 36.0);
        assert_relative_eq!(future[1], 49.0);
    }
}
