use chrono::NaiveDate;
use registration_forecast::ForecastError;
use series_math::MathError;
use std::io;

#[test]
fn test_error_display() {
    let malformed = ForecastError::MalformedDate {
        file: "event.csv".to_string(),
        row: 7,
        value: "13/13/2024".to_string(),
        format: "%d/%m/%Y".to_string(),
    };
    assert_eq!(
        malformed.to_string(),
        "Malformed date in event.csv row 7: '13/13/2024' does not match format '%d/%m/%Y'"
    );

    let target = ForecastError::InvalidTargetDate {
        value: "soon".to_string(),
        format: "%d/%m/%Y".to_string(),
    };
    assert_eq!(
        target.to_string(),
        "Invalid target date 'soon': expected format '%d/%m/%Y'"
    );

    let empty = ForecastError::EmptySeries("no rows".to_string());
    assert_eq!(empty.to_string(), "Empty series: no rows");
}

#[test]
fn test_overlap_message_names_range() {
    let err = ForecastError::OverlapAmbiguity {
        first: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        last: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        count: 2,
    };

    let message = err.to_string();
    assert!(message.contains("2 day(s)"));
    assert!(message.contains("2024-01-03"));
    assert!(message.contains("2024-01-04"));
}

#[test]
fn test_error_conversions() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
    assert!(matches!(ForecastError::from(io_err), ForecastError::IoError(_)));

    let math_err = MathError::CalculationError("singular".to_string());
    match ForecastError::from(math_err) {
        ForecastError::ModelFit(msg) => assert!(msg.contains("singular")),
        other => panic!("Expected ModelFit, got {:?}", other),
    }

    let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
    assert!(matches!(ForecastError::from(toml_err), ForecastError::ConfigError(_)));
}
