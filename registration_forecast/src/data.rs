//! Registration record loading from CSV and Excel tables

use crate::error::{ForecastError, Result};
use calamine::{open_workbook, DataType as Cell, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default name of the registration timestamp column
pub const DEFAULT_DATE_COLUMN: &str = "Created Date";

/// Default day/month/year date format
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// One registration row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// Raw creation timestamp as read from the table
    raw_date: String,
    /// Label of the table the row came from
    source: String,
    /// 1-based data row number within the source (header excluded)
    row: usize,
}

impl RegistrationRecord {
    /// Create a record from its raw creation timestamp
    pub fn new(raw_date: impl Into<String>, source: impl Into<String>, row: usize) -> Self {
        Self {
            raw_date: raw_date.into(),
            source: source.into(),
            row,
        }
    }

    /// Raw creation timestamp
    pub fn raw_date(&self) -> &str {
        &self.raw_date
    }

    /// Label of the table the row came from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 1-based data row number
    pub fn row(&self) -> usize {
        self.row
    }
}

/// Where the creation timestamp lives in an input table and how it is written
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableSpec {
    /// Name of the timestamp column
    pub date_column: String,
    /// chrono format of the date part of the timestamp
    pub date_format: String,
}

impl Default for TableSpec {
    fn default() -> Self {
        Self {
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Loader for registration tables
#[derive(Debug)]
pub struct RecordLoader;

impl RecordLoader {
    /// Load records from a `.csv` or `.xlsx` file
    pub fn from_path<P: AsRef<Path>>(path: P, spec: &TableSpec) -> Result<Vec<RegistrationRecord>> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Self::from_csv(path, spec),
            Some("xlsx") => Self::from_excel(path, spec),
            _ => Err(ForecastError::DataError(format!(
                "Unsupported file type for '{}': expected .csv or .xlsx",
                path.display()
            ))),
        }
    }

    /// Load records from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, spec: &TableSpec) -> Result<Vec<RegistrationRecord>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(Some(0))
            .has_header(true)
            .finish()?;

        Self::from_dataframe(&df, &source_label(path), spec)
    }

    /// Load records from the first worksheet of an Excel workbook
    pub fn from_excel<P: AsRef<Path>>(path: P, spec: &TableSpec) -> Result<Vec<RegistrationRecord>> {
        let path = path.as_ref();
        let source = source_label(path);
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        let sheet = workbook.sheet_names().first().cloned().ok_or_else(|| {
            ForecastError::DataError(format!("Workbook '{}' has no sheets", source))
        })?;
        let range = workbook.worksheet_range(&sheet)?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| ForecastError::DataError(format!("Sheet '{}' in '{}' is empty", sheet, source)))?;
        let names: Vec<String> = header.iter().map(|c| c.to_string()).collect();
        let column = Self::find_date_column(&names, &source, spec)?;

        let records = rows
            .enumerate()
            .map(|(i, row)| {
                let raw = row
                    .get(column)
                    .map(|cell| excel_cell_to_date_string(cell, &spec.date_format))
                    .unwrap_or_default();
                RegistrationRecord::new(raw, source.clone(), i + 1)
            })
            .collect::<Vec<_>>();

        debug!(source = %source, rows = records.len(), "loaded registration workbook");
        Ok(records)
    }

    /// Extract records from an in-memory table
    pub fn from_dataframe(df: &DataFrame, source: &str, spec: &TableSpec) -> Result<Vec<RegistrationRecord>> {
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        let column = Self::find_date_column(&names, source, spec)?;

        let dates = df.column(&names[column])?.cast(&DataType::Utf8)?;
        let records = dates
            .utf8()?
            .into_iter()
            .enumerate()
            .map(|(i, value)| RegistrationRecord::new(value.unwrap_or_default(), source, i + 1))
            .collect::<Vec<_>>();

        debug!(source = %source, rows = records.len(), "loaded registration table");
        Ok(records)
    }

    /// Locate the timestamp column, tolerating case and surrounding whitespace
    fn find_date_column(names: &[String], source: &str, spec: &TableSpec) -> Result<usize> {
        names
            .iter()
            .position(|n| n == &spec.date_column)
            .or_else(|| {
                names
                    .iter()
                    .position(|n| n.trim().eq_ignore_ascii_case(spec.date_column.trim()))
            })
            .ok_or_else(|| {
                ForecastError::DataError(format!(
                    "Column '{}' not found in '{}' (columns: {})",
                    spec.date_column,
                    source,
                    names.join(", ")
                ))
            })
    }
}

/// Load and concatenate the historical registration tables
pub fn load_historical<P: AsRef<Path>>(paths: &[P], spec: &TableSpec) -> Result<Vec<RegistrationRecord>> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(RecordLoader::from_path(path, spec)?);
    }
    Ok(records)
}

/// Short label used in error messages for a file
fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}

/// Render a spreadsheet cell in the configured date format.
///
/// Cells Excel stores as dates are serial day numbers; they are converted so
/// the aggregator sees the same text a CSV export would contain.
fn excel_cell_to_date_string(cell: &Cell, format: &str) -> String {
    match cell {
        Cell::DateTime(serial) => excel_serial_to_date(*serial)
            .map(|d| d.format(format).to_string())
            .unwrap_or_else(|| serial.to_string()),
        Cell::DateTimeIso(iso) => NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S")
            .map(|dt| dt.date())
            .or_else(|_| NaiveDate::parse_from_str(iso, "%Y-%m-%d"))
            .map(|d| d.format(format).to_string())
            .unwrap_or_else(|_| iso.clone()),
        Cell::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Convert an Excel serial day number (1900 date system) to a date
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
