use polars::prelude::*;
use pretty_assertions::assert_eq;
use registration_forecast::data::{load_historical, RecordLoader, TableSpec};
use registration_forecast::ForecastError;
use simple_excel_writer::{row, Row, Workbook};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Helper function to write a registration table into a temp directory
fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_csv_records() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "event.csv",
        "Name,Created Date,Ticket\n\
         Ada,01/03/2024 09:15,Standard\n\
         Grace,02/03/2024,VIP\n\
         Linus,02/03/2024 17:40,Standard\n",
    );

    let records = RecordLoader::from_path(&path, &TableSpec::default()).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].raw_date(), "01/03/2024 09:15");
    assert_eq!(records[1].raw_date(), "02/03/2024");
    assert_eq!(records[2].row(), 3);
    assert_eq!(records[0].source(), "event.csv");
}

#[test]
fn test_empty_date_cells_are_kept() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "gaps.csv", "Name,Created Date\nAda,01/03/2024\nGrace,\n");

    let records = RecordLoader::from_csv(&path, &TableSpec::default()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].raw_date(), "");
    assert_eq!(records[1].row(), 2);
}

#[test]
fn test_missing_date_column() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "nodate.csv", "Name,Email\nAda,ada@example.com\n");

    let result = RecordLoader::from_path(&path, &TableSpec::default());

    match result {
        Err(ForecastError::DataError(msg)) => {
            assert!(msg.contains("Created Date"));
            assert!(msg.contains("nodate.csv"));
        }
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_custom_date_column() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "custom.csv", "id,Registered\n1,2024-03-01\n2,2024-03-02\n");
    let spec = TableSpec {
        date_column: "registered".to_string(),
        date_format: "%Y-%m-%d".to_string(),
    };

    let records = RecordLoader::from_path(&path, &spec).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].raw_date(), "2024-03-02");
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "event.txt", "Created Date\n01/03/2024\n");

    assert!(matches!(
        RecordLoader::from_path(&path, &TableSpec::default()),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");

    assert!(matches!(
        RecordLoader::from_path(&path, &TableSpec::default()),
        Err(ForecastError::IoError(_))
    ));
}

#[test]
fn test_from_dataframe() {
    let df = df!(
        "Created Date" => &["01/03/2024", "05/03/2024"],
        "Name" => &["Ada", "Grace"]
    )
    .unwrap();

    let records = RecordLoader::from_dataframe(&df, "memory", &TableSpec::default()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source(), "memory");
    assert_eq!(records[1].raw_date(), "05/03/2024");
}

#[test]
fn test_load_historical_concatenates_files() {
    let dir = TempDir::new().unwrap();
    let first = write_file(&dir, "2022.csv", "Created Date\n01/03/2022\n02/03/2022\n");
    let second = write_file(&dir, "2023.csv", "Created Date\n01/03/2023\n");

    let records = load_historical(&[first, second], &TableSpec::default()).unwrap();

    let sources: Vec<&str> = records.iter().map(|r| r.source()).collect();
    assert_eq!(sources, vec!["2022.csv", "2022.csv", "2023.csv"]);
}

#[test]
fn test_load_excel_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("event.xlsx");
    let mut workbook = Workbook::create(path.to_str().unwrap());
    let mut sheet = workbook.create_sheet("Registrations");
    workbook
        .write_sheet(&mut sheet, |writer| {
            writer.append_row(row!["Name", "created date", "Ticket"])?;
            writer.append_row(row!["Ada", "01/03/2024 09:15", "Standard"])?;
            writer.append_row(row!["Grace", (), "VIP"])?;
            writer.append_row(row!["Linus", "02/03/2024", "Standard"])
        })
        .unwrap();
    workbook.close().unwrap();

    let records = RecordLoader::from_path(&path, &TableSpec::default()).unwrap();

    let rows: Vec<(usize, &str)> = records.iter().map(|r| (r.row(), r.raw_date())).collect();
    assert_eq!(rows, vec![(1, "01/03/2024 09:15"), (2, ""), (3, "02/03/2024")]);
    assert_eq!(records[0].source(), "event.xlsx");
}
