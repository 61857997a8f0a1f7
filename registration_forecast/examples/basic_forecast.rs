use chrono::{Days, NaiveDate};
use registration_forecast::models::{ArimaStrategy, DecompositionStrategy, ForecastStrategy};
use registration_forecast::pipeline::{Pipeline, PipelineConfig};
use registration_forecast::postprocess::DISCLAIMER;
use registration_forecast::{DailySeries, RegistrationRecord};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Registration Forecast: Basic Forecasting Example");
    println!("================================================\n");

    // Historical registrations of a previous event
    let historical = create_historical_series();
    println!(
        "Historical series: {} days, {} registrations\n",
        historical.len(),
        historical.total()
    );

    // Partial registrations of the current event
    let partial = create_partial_records();
    let last_partial = NaiveDate::from_ymd_opt(2024, 3, 14).ok_or("invalid date")?;
    let target = last_partial + Days::new(30);

    let strategies: Vec<Box<dyn ForecastStrategy>> = vec![
        Box::new(DecompositionStrategy::new()),
        Box::new(ArimaStrategy::new(2, 1)?),
    ];

    for strategy in strategies {
        let pipeline = Pipeline::new(historical.clone(), PipelineConfig::default(), strategy);
        let report = pipeline.run(&partial, target)?;

        println!("Strategy: {}", pipeline.strategy_name());
        println!("  Horizon: {} days", report.horizon());
        println!("  {}", report.summary().display_line());
        println!(
            "  Event registrations including forecast: {}",
            report.summary().event_actual_plus_forecast
        );

        for row in report.plot_series().iter().rev().take(3).rev() {
            println!(
                "  {}  forecast {:>7.2}  band {:?}..{:?}",
                row.date, row.forecast, row.lower, row.upper
            );
        }
        println!();
    }

    println!("{}", DISCLAIMER);
    Ok(())
}

// Helper to create a year of registrations with weekly seasonality
fn create_historical_series() -> DailySeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default();
    let counts = (0..365u64)
        .map(|i| {
            let weekday_boost = if i % 7 < 5 { 4 } else { 1 };
            let trend = i / 60;
            weekday_boost + trend
        })
        .collect();
    DailySeries::new(start, counts)
}

// Helper to create two weeks of current-event registrations
fn create_partial_records() -> Vec<RegistrationRecord> {
    let mut records = Vec::new();
    for day in 1..=14u32 {
        for n in 0..(day % 4 + 2) {
            records.push(RegistrationRecord::new(
                format!("{:02}/03/2024 09:{:02}", day, n),
                "current_event.csv",
                records.len() + 1,
            ));
        }
    }
    records
}
