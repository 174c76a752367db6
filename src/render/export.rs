//! CSV export of diagnostics.

use super::{ColumnMode, ExportOptions};
use crate::error::{Error, Result};
use crate::validate::DiagnosticRecord;
use std::io::Write;

/// Header of the export when the column is included.
pub const EXPORT_HEADER: [&str; 3] = ["line_number", "column", "message"];

/// Name of the export file for an uploaded file.
pub fn export_filename(original: &str) -> String {
    format!("{} errors.csv", original)
}

/// Resolve whether the column field is written for these records.
pub fn include_column(records: &[DiagnosticRecord], mode: ColumnMode) -> bool {
    match mode {
        ColumnMode::Always => true,
        ColumnMode::Never => false,
        ColumnMode::Auto => records.iter().any(DiagnosticRecord::has_column),
    }
}

/// Write diagnostics as CSV.
pub fn write_csv<W: Write>(
    writer: W,
    records: &[DiagnosticRecord],
    options: &ExportOptions,
) -> Result<()> {
    let with_column = include_column(records, options.column_mode);
    let mut csv = ::csv::Writer::from_writer(writer);

    if options.include_header {
        let header: Vec<&str> = EXPORT_HEADER
            .iter()
            .copied()
            .filter(|name| with_column || *name != "column")
            .collect();
        csv.write_record(&header).map_err(export_error)?;
    }

    for record in records {
        let line = record.line_number.to_string();
        let written = if with_column {
            csv.write_record([line.as_str(), record.column.as_str(), record.message.as_str()])
        } else {
            csv.write_record([line.as_str(), record.message.as_str()])
        };
        written.map_err(export_error)?;
    }

    csv.flush()?;
    Ok(())
}

/// Render diagnostics as a CSV string.
pub fn to_csv(records: &[DiagnosticRecord], options: &ExportOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records, options)?;
    String::from_utf8(buffer).map_err(|e| Error::Export(format!("export is not UTF-8: {}", e)))
}

fn export_error(err: ::csv::Error) -> Error {
    Error::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<DiagnosticRecord> {
        vec![
            DiagnosticRecord::new(2, "zipcode", "\"2139\" does not match \"^[0-9]{5}$\""),
            DiagnosticRecord::new(3, "sample_id", "\"sample_id\" is a required property"),
        ]
    }

    #[test]
    fn test_to_csv_with_column() {
        let csv = to_csv(&records(), &ExportOptions::default()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "line_number,column,message");
        assert_eq!(lines[1], "2,zipcode,\"\"\"2139\"\" does not match \"\"^[0-9]{5}$\"\"\"");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_auto_drops_blank_columns() {
        let records = vec![DiagnosticRecord::new(1, "", "[] has less than 1 item")];
        let csv = to_csv(&records, &ExportOptions::default()).unwrap();
        assert!(csv.starts_with("line_number,message\n"));

        let csv = to_csv(
            &records,
            &ExportOptions::new().with_column_mode(ColumnMode::Always),
        )
        .unwrap();
        assert!(csv.starts_with("line_number,column,message\n"));
        assert!(csv.contains("1,,"));
    }

    #[test]
    fn test_never_and_no_header() {
        let options = ExportOptions::new()
            .with_column_mode(ColumnMode::Never)
            .with_header(false);
        let csv = to_csv(&records(), &options).unwrap();
        assert!(csv.starts_with("2,"));
        assert!(!csv.contains("zipcode,"));
    }

    #[test]
    fn test_empty_export_has_header() {
        let csv = to_csv(&[], &ExportOptions::new().with_column_mode(ColumnMode::Always)).unwrap();
        assert_eq!(csv, "line_number,column,message\n");
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("samples.xlsx"), "samples.xlsx errors.csv");
    }
}
