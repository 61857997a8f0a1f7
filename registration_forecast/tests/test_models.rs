use approx::assert_relative_eq;
use chrono::NaiveDate;
use registration_forecast::models::decomposition::SeasonalitySetting;
use registration_forecast::models::{ArimaStrategy, DecompositionStrategy, ForecastStrategy};
use registration_forecast::{DailySeries, ForecastError};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn series(counts: Vec<u64>) -> DailySeries {
    DailySeries::new(start(), counts)
}

// Two busy days a week on top of a flat base
fn weekly_pattern(weeks: u64) -> Vec<u64> {
    (0..weeks * 7).map(|i| if i % 7 >= 5 { 15 } else { 10 }).collect()
}

// Weekly pattern with deterministic jitter
fn noisy_weekly(weeks: u64) -> Vec<u64> {
    weekly_pattern(weeks)
        .into_iter()
        .enumerate()
        .map(|(i, c)| c + (i as u64 * 7919) % 5)
        .collect()
}

#[test]
fn test_decomposition_output_shape() {
    let data = series(noisy_weekly(6));
    let model = DecompositionStrategy::new();

    let forecast = model.fit_and_forecast(&data, 10).unwrap();

    assert_eq!(forecast.len(), data.len() + 10);
    assert_eq!(forecast.last_observed(), data.end().unwrap());
    assert_eq!(forecast.future().count(), 10);
    assert_eq!(forecast.points()[0].date, start());
    assert!(forecast.has_intervals());
    assert!(forecast
        .points()
        .windows(2)
        .all(|w| (w[1].date - w[0].date).num_days() == 1));
}

#[test]
fn test_decomposition_linear_trend() {
    let counts: Vec<u64> = (0..30).map(|i| 10 + 2 * i).collect();
    let model = DecompositionStrategy::new();

    let forecast = model.fit_and_forecast(&series(counts), 5).unwrap();

    let values = forecast.values();
    assert_relative_eq!(values[0], 10.0, epsilon = 1e-6);
    assert_relative_eq!(values[29], 68.0, epsilon = 1e-6);
    assert_relative_eq!(values[34], 78.0, epsilon = 1e-6);
}

#[test]
fn test_decomposition_weekly_seasonality() {
    let model = DecompositionStrategy::new();

    let forecast = model.fit_and_forecast(&series(weekly_pattern(8)), 7).unwrap();

    // Future days continue the index used to build the pattern.
    let future: Vec<(usize, f64)> = forecast
        .future()
        .enumerate()
        .map(|(k, p)| (56 + k, p.value))
        .collect();
    let busy_min = future
        .iter()
        .filter(|(i, _)| i % 7 >= 5)
        .map(|(_, v)| *v)
        .fold(f64::INFINITY, f64::min);
    let quiet_max = future
        .iter()
        .filter(|(i, _)| i % 7 < 5)
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);

    assert!(busy_min > quiet_max);
    assert_relative_eq!(busy_min, 15.0, epsilon = 0.5);
    assert_relative_eq!(quiet_max, 10.0, epsilon = 0.5);
}

#[test]
fn test_decomposition_intervals() {
    let data = series(noisy_weekly(10));
    let narrow = DecompositionStrategy::new().fit_and_forecast(&data, 30).unwrap();
    let wide = DecompositionStrategy::new()
        .with_interval_width(0.95)
        .fit_and_forecast(&data, 30)
        .unwrap();

    for p in narrow.points() {
        let (lower, upper) = (p.lower.unwrap(), p.upper.unwrap());
        assert!(lower <= p.value && p.value <= upper);
    }

    let width = |p: &registration_forecast::models::ForecastPoint| p.upper.unwrap() - p.lower.unwrap();
    let last_hist = narrow.history().last().unwrap();
    let last_future = narrow.future().last().unwrap();
    assert!(width(last_future) >= width(last_hist));
    assert!(width(wide.future().last().unwrap()) > width(last_future));
}

#[test]
fn test_decomposition_without_seasonality() {
    let model = DecompositionStrategy::new()
        .with_weekly_seasonality(SeasonalitySetting::Disabled)
        .with_changepoints(0);
    let counts: Vec<u64> = vec![4; 20];

    let forecast = model.fit_and_forecast(&series(counts), 3).unwrap();

    for value in forecast.values() {
        assert_relative_eq!(value, 4.0, epsilon = 1e-6);
    }
}

#[test]
fn test_decomposition_needs_two_observations() {
    let model = DecompositionStrategy::new();

    assert!(matches!(
        model.fit_and_forecast(&series(vec![3]), 5),
        Err(ForecastError::ModelFit(_))
    ));
    assert!(matches!(
        model.fit_and_forecast(&DailySeries::empty(), 5),
        Err(ForecastError::ModelFit(_))
    ));
}

#[test]
fn test_decomposition_all_zero_series() {
    let forecast = DecompositionStrategy::new()
        .fit_and_forecast(&series(vec![0; 21]), 7)
        .unwrap();

    for value in forecast.values() {
        assert_relative_eq!(value, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_arima_recovers_alternating_process() {
    // y_t = 10 - y_{t-1}
    let counts: Vec<u64> = (0..20).map(|i| if i % 2 == 0 { 2 } else { 8 }).collect();
    let model = ArimaStrategy::new(1, 0).unwrap().with_constant(true);

    let forecast = model.fit_and_forecast(&series(counts), 4).unwrap();

    let future: Vec<f64> = forecast.future().map(|p| p.value).collect();
    assert_relative_eq!(future[0], 2.0, epsilon = 1e-6);
    assert_relative_eq!(future[1], 8.0, epsilon = 1e-6);
    assert_relative_eq!(future[3], 8.0, epsilon = 1e-6);
    assert!(!forecast.has_intervals());
}

#[test]
fn test_arima_output_shape() {
    let data = series(noisy_weekly(4));
    let forecast = ArimaStrategy::default().fit_and_forecast(&data, 12).unwrap();

    assert_eq!(forecast.model_name(), "ARIMA(5,1,0)");
    assert_eq!(forecast.len(), data.len() + 12);
    // The first day has no differenced value and is reproduced as observed.
    assert_relative_eq!(forecast.values()[0], data.values()[0]);
}

#[test]
fn test_arima_insufficient_data() {
    let result = ArimaStrategy::default().fit_and_forecast(&series(vec![1, 2, 3, 4, 5]), 3);

    match result {
        Err(ForecastError::ModelFit(msg)) => {
            assert!(msg.contains("at least 6"));
            assert!(msg.contains("got 5"));
        }
        other => panic!("Expected ModelFit, got {:?}", other),
    }
}

#[test]
fn test_arima_fits_short_series() {
    let counts = vec![3, 5, 4, 6, 5, 7, 6, 8, 7, 9];

    for n in 6..=counts.len() {
        let data = series(counts[..n].to_vec());
        let forecast = ArimaStrategy::default().fit_and_forecast(&data, 4).unwrap();

        assert_eq!(forecast.len(), n + 4);
        assert_eq!(forecast.future().count(), 4);
        assert!(forecast.values().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_zero_horizon_has_no_future() {
    let data = series(noisy_weekly(3));

    for model in [
        Box::new(DecompositionStrategy::new()) as Box<dyn ForecastStrategy>,
        Box::new(ArimaStrategy::new(2, 1).unwrap()),
    ] {
        let forecast = model.fit_and_forecast(&data, 0).unwrap();
        assert_eq!(forecast.future().count(), 0);
        assert_eq!(forecast.len(), data.len());
    }
}

#[test]
fn test_strategies_are_deterministic() {
    let data = series(noisy_weekly(5));

    for model in [
        Box::new(DecompositionStrategy::new()) as Box<dyn ForecastStrategy>,
        Box::new(ArimaStrategy::default()),
    ] {
        let first = model.fit_and_forecast(&data, 14).unwrap();
        let second = model.fit_and_forecast(&data, 14).unwrap();
        assert_eq!(first, second);
    }
}
