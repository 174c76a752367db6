//! XLSX workbook reader backed by calamine.

use super::{DocumentReader, ParseOptions};
use crate::detect::{check_container, InputFormat};
use crate::error::{Error, Result};
use crate::model::{Cell, Document, Page};
use calamine::{Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::io::Cursor;

/// XLSX reader.
#[derive(Debug, Clone, Default)]
pub struct XlsxReader {
    _private: (),
}

impl XlsxReader {
    /// Create a new XLSX reader.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl DocumentReader for XlsxReader {
    fn supported_extensions(&self) -> &[&str] {
        &["xlsx"]
    }

    fn name(&self) -> &str {
        "xlsx"
    }

    fn read(&self, filename: &str, data: &[u8], _options: &ParseOptions) -> Result<Document> {
        check_container(InputFormat::Xlsx, data)?;

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))?;
        let sheet_names = workbook.sheet_names().to_vec();
        log::debug!("Workbook {} has sheets {:?}", filename, sheet_names);

        let mut pages = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                Error::MalformedDocument(format!("failed to read sheet '{}': {}", name, e))
            })?;
            pages.push(page_from_range(&name, &range));
        }

        Document::new(filename, InputFormat::Xlsx, pages)
    }
}

/// Build a page from a worksheet range.
///
/// The first row of the used range is the header row.
pub fn page_from_range(name: &str, range: &Range<Data>) -> Page {
    let grid = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();
    Page::with_grid(name, grid)
}

/// Convert a calamine cell to a model cell.
pub fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::string(s.clone()),
        Data::Float(f) => Cell::number(*f),
        Data::Int(i) => Cell::number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(value) => Cell::date(value, value.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(value) => Cell::date(value, s.clone()),
            None => Cell::string(s.clone()),
        },
        Data::DurationIso(s) => Cell::string(s.clone()),
        Data::Error(e) => Cell::string(format!("{:?}", e)),
    }
}

/// First serial past 9999-12-31, the last date Excel can display.
const EXCEL_SERIAL_END: f64 = 2_958_466.0;

/// Convert an Excel serial date (days since 1899-12-30) to calendar fields.
///
/// Serials outside Excel's date range (including NaN) give `None`.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !(0.0..EXCEL_SERIAL_END).contains(&serial) {
        return None;
    }

    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.floor() as i64;
    let seconds = ((serial - serial.floor()) * 86_400.0).round() as i64;

    epoch
        .checked_add_signed(TimeDelta::try_days(days)?)?
        .checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
