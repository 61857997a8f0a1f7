//! CSV export of plot-ready forecast rows

use crate::error::Result;
use crate::pipeline::PlotRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 5] = ["date", "actual", "forecast", "lower", "upper"];

/// Write plot rows as CSV; absent values become empty fields
pub fn write_plot_csv<W: Write>(writer: W, rows: &[PlotRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write plot rows to a CSV file, replacing it if it exists
pub fn write_plot_csv_file<P: AsRef<Path>>(path: P, rows: &[PlotRow]) -> Result<()> {
    let file = File::create(path)?;
    write_plot_csv(file, rows)
}
