//! Input format detection and validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tabular container formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Comma separated values (single page)
    Csv,
    /// Office Open XML workbook
    Xlsx,
}

impl InputFormat {
    /// Lowercase extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            InputFormat::Csv => "csv",
            InputFormat::Xlsx => "xlsx",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Csv => write!(f, "CSV"),
            InputFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}

/// Zip local file header: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Detect the input format from a declared filename.
///
/// Only the suffix is inspected (case-insensitive).
///
/// # Returns
/// * `Ok(InputFormat)` for `.csv` and `.xlsx` names
/// * `Err(Error::UnsupportedFormat)` for anything else
///
/// # Example
/// ```
/// use sheetcheck::detect::{detect_format_from_name, InputFormat};
///
/// assert_eq!(detect_format_from_name("samples.XLSX").unwrap(), InputFormat::Xlsx);
/// assert!(detect_format_from_name("samples.xls").is_err());
/// ```
pub fn detect_format_from_name(filename: &str) -> Result<InputFormat> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".xlsx") {
        Ok(InputFormat::Xlsx)
    } else if lower.ends_with(".csv") {
        Ok(InputFormat::Csv)
    } else {
        Err(Error::UnsupportedFormat(filename.to_string()))
    }
}

/// Detect the input format from a file path.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<InputFormat> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    detect_format_from_name(&name)
}

/// Check that bytes are plausible for the declared format.
///
/// XLSX files are zip archives; anything without the zip header is
/// rejected before it reaches the workbook reader. CSV has no magic.
pub fn check_container(format: InputFormat, data: &[u8]) -> Result<()> {
    match format {
        InputFormat::Xlsx if !is_zip_container(data) => Err(Error::MalformedDocument(
            "file is not a valid XLSX workbook".into(),
        )),
        _ => Ok(()),
    }
}

/// Check if bytes start with a zip local file header.
pub fn is_zip_container(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Check if a filename has an accepted suffix.
pub fn is_supported_name(filename: &str) -> bool {
    detect_format_from_name(filename).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_csv_and_xlsx() {
        assert_eq!(detect_format_from_name("data.csv").unwrap(), InputFormat::Csv);
        assert_eq!(detect_format_from_name("data.xlsx").unwrap(), InputFormat::Xlsx);
        assert_eq!(detect_format_from_name("DATA.CSV").unwrap(), InputFormat::Csv);
    }

    #[test]
    fn test_detect_unsupported() {
        let result = detect_format_from_name("data.pdf");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));

        // suffix must be the real extension
        assert!(!is_supported_name("data.csv.txt"));
        assert!(!is_supported_name("xlsx"));
    }

    #[test]
    fn test_detect_from_path() {
        assert_eq!(
            detect_format_from_path("/tmp/uploads/week 12.xlsx").unwrap(),
            InputFormat::Xlsx
        );
    }

    #[test]
    fn test_container_check() {
        assert!(check_container(InputFormat::Xlsx, b"PK\x03\x04rest").is_ok());
        assert!(matches!(
            check_container(InputFormat::Xlsx, b"a,b\n1,2\n"),
            Err(Error::MalformedDocument(_))
        ));
        assert!(check_container(InputFormat::Csv, b"a,b\n1,2\n").is_ok());
    }
}
