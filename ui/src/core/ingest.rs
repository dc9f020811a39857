//! Decode uploaded bytes into a [`RawTable`].

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use time::{Date, Duration, Month, PrimitiveDateTime};
use tracing::{info, warn};

use super::error::LoadError;
use super::table::{dedupe_headers, Cell, RawTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFormat {
    Csv,
    Workbook,
}

impl UploadFormat {
    /// Pick a decoder from the file extension (case-insensitive).
    pub fn detect(file_name: &str) -> Result<Self, LoadError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "txt" => Ok(UploadFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(UploadFormat::Workbook),
            _ => Err(LoadError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

pub fn load_upload(file_name: &str, bytes: &[u8]) -> Result<RawTable, LoadError> {
    let format = UploadFormat::detect(file_name)?;
    let table = match format {
        UploadFormat::Csv => read_csv(bytes)?,
        UploadFormat::Workbook => read_workbook(bytes)?,
    };
    info!(
        file = file_name,
        ?format,
        rows = table.len(),
        columns = table.columns.len(),
        "decoded upload"
    );
    Ok(table)
}

/// UTF-8 decode that skips malformed byte sequences instead of failing or
/// substituting replacement characters.
pub fn decode_utf8_lossless(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                // Safe: `valid_up_to` marks the end of a valid prefix.
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = err.error_len().unwrap_or(after.len());
                rest = &after[skip..];
            }
        }
    }
    out
}

fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

pub fn read_csv(bytes: &[u8]) -> Result<RawTable, LoadError> {
    let text = decode_utf8_lossless(bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    if text.trim().is_empty() {
        return Err(LoadError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    let mut truncated = 0usize;
    for record in reader.records() {
        let record = record?;
        if record.len() > width {
            truncated += 1;
        }
        rows.push(record.iter().take(width).map(Cell::text).collect());
    }
    if truncated > 0 {
        warn!(rows = truncated, "dropped surplus fields from CSV rows");
    }

    Ok(RawTable::new(dedupe_headers(headers), rows))
}

pub fn read_workbook(bytes: &[u8]) -> Result<RawTable, LoadError> {
    if bytes.is_empty() {
        return Err(LoadError::Empty);
    }
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook.worksheet_range_at(0).ok_or(LoadError::NoSheets)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(LoadError::Empty);
    };
    let headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
    let rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok(RawTable::new(dedupe_headers(headers), rows))
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            Cell::text(value.as_str())
        }
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) if !value.is_duration() => excel_serial_to_datetime(value.as_f64())
            .map(Cell::DateTime)
            .unwrap_or(Cell::Missing),
        Data::DateTime(value) => Cell::Number(value.as_f64()),
        Data::Error(_) => Cell::Missing,
    }
}

/// Excel serial date (days since 1899-12-30, fractional part is the time of
/// day) to a timestamp, rounded to the second.
pub fn excel_serial_to_datetime(serial: f64) -> Option<PrimitiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = Date::from_calendar_date(1899, Month::December, 30).ok()?.midnight();
    let seconds = (serial * 86_400.0).round();
    if seconds.abs() > i64::MAX as f64 {
        return None;
    }
    epoch.checked_add(Duration::seconds(seconds as i64))
}
