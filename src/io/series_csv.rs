//! Delimited file export and reload for generated series.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::info;

use crate::error::{Error, Result};
use crate::series::dates::all_midnight;
use crate::series::types::SeriesPoint;

/// Column header for series files, in write order.
pub const COLUMNS: [&str; 4] = ["Date", "Quantity", "Usage", "Denial"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Exports a series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_series_csv(points: &[SeriesPoint], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_series_csv(points, buf)?;
    info!(path = %path.display(), rows = points.len(), "series written");
    Ok(())
}

/// Writes a series as CSV to any writer.
///
/// Dates are written as `YYYY-MM-DD` when every sample falls on midnight,
/// otherwise with the time of day and any fractional seconds.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_series_csv(points: &[SeriesPoint], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(COLUMNS)?;

    let format = if all_midnight(points.iter().map(|p| p.date)) {
        DATE_FORMAT
    } else {
        DATETIME_FORMAT
    };

    for p in points {
        wtr.write_record(&[
            p.date.format(format).to_string(),
            p.capacity.to_string(),
            p.usage.to_string(),
            p.denial_count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Loads a series from a CSV file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, [`Error::MissingColumns`]
/// if any of `Date`, `Quantity`, `Usage`, `Denial` is absent, and
/// [`Error::Parse`] on the first malformed value.
pub fn load_series_csv(path: &Path) -> Result<Vec<SeriesPoint>> {
    let file = File::open(path)?;
    let points = read_series_csv(file)?;
    info!(path = %path.display(), rows = points.len(), "series loaded");
    Ok(points)
}

/// Reads a series from any reader. Column order is free and extra columns
/// are ignored.
///
/// # Errors
///
/// See [`load_series_csv`].
pub fn read_series_csv(reader: impl Read) -> Result<Vec<SeriesPoint>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let missing: Vec<String> = COLUMNS
        .iter()
        .copied()
        .filter(|c| position(c).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingColumns(missing));
    }
    let idx: Vec<usize> = COLUMNS.iter().copied().filter_map(position).collect();

    let mut points = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1.
        let row = i + 2;
        let field = |col: usize| record.get(idx[col]).unwrap_or("");

        points.push(SeriesPoint {
            date: parse_date(field(0)).ok_or_else(|| Error::Parse {
                row,
                column: COLUMNS[0].to_string(),
                message: format!("unrecognised date \"{}\"", field(0)),
            })?,
            capacity: parse_count(field(1), row, COLUMNS[1])?,
            usage: parse_count(field(2), row, COLUMNS[2])?,
            denial_count: parse_count(field(3), row, COLUMNS[3])?,
        });
    }
    Ok(points)
}

/// Accepts `YYYY-MM-DD`, or a date with time of day separated by a space or `T`.
fn parse_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn parse_count(s: &str, row: usize, column: &str) -> Result<u32> {
    s.parse::<u32>().map_err(|e| Error::Parse {
        row,
        column: column.to_string(),
        message: format!("\"{s}\" is not a non-negative integer: {e}"),
    })
}
